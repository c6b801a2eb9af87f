use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Cooperative stop signal for a running search. Clones share the flag.
/// The driver checks it between trials only.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Receives search progress in percent of the attempt budget.
/// Called from worker threads.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: f32);
}

/// Observer that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _percent: f32) {}
}

/// Observer that logs every update at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, percent: f32) {
        log::info!("Search progress: {:.0}%", percent);
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(f32) + Send + Sync,
{
    fn on_progress(&self, percent: f32) {
        self(percent)
    }
}

/// Forwards progress to an observer at most once per `step` percent.
pub(crate) struct ProgressThrottle<'a> {
    observer: &'a dyn ProgressObserver,
    step: f32,
    total: usize,
    last_reported: Mutex<f32>,
}

impl<'a> ProgressThrottle<'a> {
    pub(crate) fn new(observer: &'a dyn ProgressObserver, step: f32, total: usize) -> Self {
        ProgressThrottle { observer, step, total: total.max(1), last_reported: Mutex::new(0.0) }
    }

    pub(crate) fn trial_finished(&self, finished: usize) {
        let percent = (finished as f32 / self.total as f32 * 100.0).min(100.0);
        if percent >= 100.0 {
            // The final 100 is emitted by `finish`.
            return;
        }

        let mut last = self.last_reported.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if percent - *last >= self.step {
            *last = percent;
            self.observer.on_progress(percent);
        }
    }

    pub(crate) fn finish(&self) {
        self.observer.on_progress(100.0);
    }
}
