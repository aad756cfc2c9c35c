//! Debounce and throttle helpers for high-frequency player events
//! (resize, timeupdate, progress).

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Runs the callback once a burst of calls has been quiet for `wait`.
///
/// Only the argument of the last call in the burst is delivered. Must be
/// called from within a tokio runtime. Dropping the debouncer cancels a
/// pending invocation.
pub struct Debouncer<T> {
    func: Callback<T>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(wait: Duration, func: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Restart the quiet period with a new argument
    pub fn call(&self, arg: T) {
        let func = Arc::clone(&self.func);
        let wait = self.wait;
        let handle = tokio::spawn(async move {
            time::sleep(wait).await;
            func(arg);
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Drop the pending invocation, if any
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.abort();
        }
    }
}

/// Runs the callback at most once per `limit`; calls inside the window are dropped.
pub struct Throttle<T> {
    func: Callback<T>,
    limit: Duration,
    last_run: Mutex<Option<Instant>>,
}

impl<T> Throttle<T> {
    pub fn new(limit: Duration, func: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
            limit,
            last_run: Mutex::new(None),
        }
    }

    /// Invoke the callback unless the window is still open. Returns whether it ran.
    pub fn call(&self, arg: T) -> bool {
        let now = Instant::now();
        {
            let mut last_run = self.last_run.lock();
            if let Some(last) = *last_run {
                if now.saturating_duration_since(last) < self.limit {
                    return false;
                }
            }
            *last_run = Some(now);
        }
        (self.func)(arg);
        true
    }
}
