use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::schedule::Schedule;

#[derive(Debug, Default)]
struct Inner {
    best: Option<Schedule>,

    /// Every distinct score seen, with the lowest trial index that produced it.
    seen: BTreeMap<i64, usize>,
}

/// Best schedule found so far, shared between worker threads.
///
/// Lower scores win. Among equal scores the lowest trial index wins, so the
/// outcome does not depend on the order in which workers report.
#[derive(Debug)]
pub struct SharedBest {
    /// Score of the installed schedule for lock-free reads.
    upper_bound: AtomicI64,
    inner: Mutex<Inner>,
}

impl Default for SharedBest {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBest {
    pub fn new() -> Self {
        SharedBest { upper_bound: AtomicI64::new(i64::MAX), inner: Mutex::new(Inner::default()) }
    }

    /// Score of the current best, `i64::MAX` while empty.
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Records the schedule's score and installs it if it beats the current best.
    /// A score already recorded by an earlier trial is dropped.
    ///
    /// # Returns
    /// `true` if the schedule became the new best.
    pub fn offer(&self, schedule: Schedule) -> bool {
        let score = schedule.score();
        let trial = schedule.trial();

        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match inner.seen.get(&score) {
            Some(&first) if first <= trial => return false,
            _ => {
                inner.seen.insert(score, trial);
            }
        }

        let better = match &inner.best {
            None => true,
            Some(current) => score < current.score() || (score == current.score() && trial < current.trial()),
        };
        if better {
            inner.best = Some(schedule);
            self.upper_bound.store(score, Ordering::Relaxed);
        }
        better
    }

    pub fn distinct_scores(&self) -> usize {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).seen.len()
    }

    pub fn into_best(self) -> Option<Schedule> {
        self.inner.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()).best
    }
}
