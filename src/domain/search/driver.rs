use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::catalog::Catalog;
use crate::domain::engine::run_trial;
use crate::domain::roster::{CamperIndex, Roster};
use crate::domain::schedule::Schedule;
use crate::domain::search::config::SearchConfig;
use crate::domain::search::monitor::{CancelToken, NoProgress, ProgressObserver, ProgressThrottle};
use crate::domain::search::shared_best::SharedBest;
use crate::error::{Error, Result};

/// Target for per-trial analytics events.
pub const ANALYTICS_TARGET: &str = "camp_scheduler::analytics";

/// Lifecycle of a [`TrialDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running { trial: usize, of: usize },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    AttemptsExhausted,
    TimeLimit,
    Cancelled,
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Schedule,

    /// Trials that ran to the end, successfully or not.
    pub attempted: usize,
    pub completed: usize,
    pub failed: usize,
    pub distinct_scores: usize,
    pub reason: TerminationReason,
}

/// Runs independent scheduling trials and keeps the best-scoring schedule.
#[derive(Debug)]
pub struct TrialDriver {
    catalog: Arc<Catalog>,
    roster: Arc<Roster>,
    config: SearchConfig,
    cancel: CancelToken,
    state: Mutex<DriverState>,
}

/// Counters shared by all workers of one run.
#[derive(Debug, Default)]
struct RunCounters {
    next_trial: AtomicUsize,
    finished: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    timed_out: AtomicBool,
}

impl TrialDriver {
    pub fn new(catalog: Catalog, roster: Roster, config: SearchConfig) -> Result<Self> {
        config.validate()?;

        Ok(TrialDriver {
            catalog: Arc::new(catalog),
            roster: Arc::new(roster),
            config,
            cancel: CancelToken::new(),
            state: Mutex::new(DriverState::Idle),
        })
    }

    /// Uses an externally owned token, e.g. one wired to a signal handler.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, state: DriverState) {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// Moves the running trial count forward. Reports from workers may arrive
    /// out of order, so a lower count never replaces a higher one.
    fn record_finished(&self, finished: usize) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let DriverState::Running { trial, of } = *state {
            if finished > trial {
                *state = DriverState::Running { trial: finished, of };
            }
        }
    }

    pub fn run(&self) -> Result<SearchOutcome> {
        self.run_with_progress(&NoProgress)
    }

    pub fn run_with_progress(&self, observer: &dyn ProgressObserver) -> Result<SearchOutcome> {
        let max_attempts = self.config.max_attempts;
        let base_seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let deadline = self.config.time_limit().map(|limit| Instant::now() + limit);

        log::info!(
            "Starting search: {} attempts on {} thread(s), {} campers, {} classes, seed {}.",
            max_attempts,
            self.config.threads,
            self.roster.len(),
            self.catalog.len(),
            base_seed
        );
        self.set_state(DriverState::Running { trial: 0, of: max_attempts });

        let best = SharedBest::new();
        let counters = RunCounters::default();
        let progress = ProgressThrottle::new(observer, self.config.progress_step, max_attempts);

        thread::scope(|scope| {
            for _ in 0..self.config.threads {
                scope.spawn(|| self.worker(base_seed, deadline, &best, &counters, &progress));
            }
        });

        progress.finish();
        self.set_state(DriverState::Done);

        let attempted = counters.finished.load(Ordering::Relaxed);
        let completed = counters.completed.load(Ordering::Relaxed);
        let failed = counters.failed.load(Ordering::Relaxed);
        let distinct_scores = best.distinct_scores();

        let reason = if self.cancel.is_cancelled() {
            TerminationReason::Cancelled
        } else if counters.timed_out.load(Ordering::Relaxed) {
            TerminationReason::TimeLimit
        } else {
            TerminationReason::AttemptsExhausted
        };

        if completed == 0 && reason == TerminationReason::Cancelled {
            log::warn!("Search cancelled after {} attempted trials without a result.", attempted);
            return Err(Error::Cancelled);
        }

        let max_ratio = self.config.max_failure_ratio;
        if attempted > 0 && failed as f64 / attempted as f64 > max_ratio {
            log::error!("{} of {} trials failed, above the allowed ratio of {}.", failed, attempted, max_ratio);
            return Err(Error::TooManyFailedTrials { attempted, failed, max_ratio });
        }

        let Some(best) = best.into_best() else {
            return Err(Error::NoFeasibleSchedule { attempted, failed });
        };

        log::info!(
            "Search finished ({:?}): {} attempted, {} completed, {} failed, {} distinct scores, best score {} from trial {}.",
            reason,
            attempted,
            completed,
            failed,
            distinct_scores,
            best.score(),
            best.trial()
        );

        Ok(SearchOutcome { best, attempted, completed, failed, distinct_scores, reason })
    }

    fn worker(&self, base_seed: u64, deadline: Option<Instant>, best: &SharedBest, counters: &RunCounters, progress: &ProgressThrottle<'_>) {
        let max_attempts = self.config.max_attempts;
        let policy = self.config.scoring_policy();

        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                counters.timed_out.store(true, Ordering::Relaxed);
                break;
            }

            let trial = counters.next_trial.fetch_add(1, Ordering::Relaxed);
            if trial >= max_attempts {
                break;
            }

            let order = shuffled_order(self.roster.len(), base_seed, trial);
            match run_trial(&self.catalog, &self.roster, order, trial, policy) {
                Ok(schedule) => {
                    counters.completed.fetch_add(1, Ordering::Relaxed);
                    let score = schedule.score();
                    let eliminated = schedule.eliminated().count();
                    let forced = schedule.forced_count();
                    let outcome = if best.offer(schedule) { "best" } else { "kept" };

                    tracing::debug!(
                        target: ANALYTICS_TARGET,
                        Trial = trial,
                        Score = score,
                        Eliminated = eliminated,
                        Forced = forced,
                        Outcome = outcome
                    );
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Trial {} discarded: {}", trial, e);
                    tracing::debug!(target: ANALYTICS_TARGET, Trial = trial, Outcome = "failed");
                }
            }

            let finished = counters.finished.fetch_add(1, Ordering::Relaxed) + 1;
            self.record_finished(finished);
            progress.trial_finished(finished);
        }
    }
}

/// Camper processing order for `trial`. Depends only on the seed and the
/// trial index, never on the thread that runs it.
pub fn shuffled_order(campers: usize, base_seed: u64, trial: usize) -> Vec<CamperIndex> {
    let seed = base_seed ^ (trial as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut order: Vec<CamperIndex> = (0..campers).collect();
    order.shuffle(&mut rng);
    order
}
