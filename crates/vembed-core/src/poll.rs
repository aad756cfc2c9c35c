//! Readiness polling for globals published by external scripts
//!
//! A [`GlobalWaiter`] is a small timer-driven state machine:
//!
//! ```text
//! Started ──► Polling{ticks} ──► Polling{ticks+1} ──► ...
//!    │              │
//!    └──────────────┴──► Resolved | Rejected
//! ```
//!
//! The first check happens at call time. After that the waiter checks once
//! per interval tick; the deadline is measured against the clock from the
//! moment the waiter was created, so tick jitter never extends it by more
//! than one interval. The interval timer lives inside [`GlobalWaiter::run`]
//! and is dropped the moment the waiter settles.

use crate::{globals::GlobalScope, types::PollRequest, Error, Result};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Waiter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Started,
    Polling { ticks: u32 },
    Resolved,
    Rejected,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Resolved | PollState::Rejected)
    }
}

/// Waits for one global symbol to become defined
pub struct GlobalWaiter<'a, G: GlobalScope> {
    globals: &'a G,
    request: PollRequest,
    interval: Duration,
    started_at: Instant,
    state: PollState,
}

impl<'a, G: GlobalScope> GlobalWaiter<'a, G> {
    pub fn new(globals: &'a G, request: PollRequest, interval: Duration) -> Self {
        Self {
            globals,
            request,
            interval,
            started_at: Instant::now(),
            state: PollState::Started,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn symbol(&self) -> &str {
        &self.request.symbol
    }

    /// Advance the machine by one check at `now`.
    ///
    /// Returns `None` while the waiter keeps polling. A settled waiter stays
    /// settled: further steps return `None` and leave the state untouched.
    pub fn step(&mut self, now: Instant) -> Option<Result<G::Value>> {
        if self.state.is_terminal() {
            return None;
        }

        if let Some(value) = self.globals.lookup(&self.request.symbol) {
            self.state = PollState::Resolved;
            return Some(Ok(value));
        }

        match self.state {
            PollState::Started => {
                self.state = PollState::Polling { ticks: 0 };
                None
            }
            PollState::Polling { ticks } => {
                if now.saturating_duration_since(self.started_at) > self.request.timeout {
                    self.state = PollState::Rejected;
                    return Some(Err(Error::Timeout {
                        symbol: self.request.symbol.clone(),
                    }));
                }
                self.state = PollState::Polling { ticks: ticks + 1 };
                None
            }
            PollState::Resolved | PollState::Rejected => None,
        }
    }

    /// Drive the machine to a terminal state
    pub async fn run(mut self) -> Result<G::Value> {
        if let Some(outcome) = self.step(Instant::now()) {
            trace!(symbol = %self.request.symbol, "Global already defined");
            return outcome;
        }

        let mut ticker = time::interval_at(self.started_at + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Some(outcome) = self.step(Instant::now()) {
                debug!(
                    symbol = %self.request.symbol,
                    state = ?self.state,
                    elapsed_ms = self.started_at.elapsed().as_millis() as u64,
                    "Global wait settled"
                );
                return outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globals::MemoryGlobals;
    use serde_json::json;

    fn request(symbol: &str, timeout_ms: u64) -> PollRequest {
        PollRequest::new(symbol, Some(Duration::from_millis(timeout_ms)))
    }

    #[test]
    fn test_step_transitions() {
        let globals = MemoryGlobals::new();
        let mut waiter = GlobalWaiter::new(&globals, request("Hls", 1_000), Duration::from_millis(100));
        let start = Instant::now();

        assert_eq!(waiter.state(), PollState::Started);
        assert!(waiter.step(start).is_none());
        assert_eq!(waiter.state(), PollState::Polling { ticks: 0 });
        assert!(waiter.step(start + Duration::from_millis(100)).is_none());
        assert_eq!(waiter.state(), PollState::Polling { ticks: 1 });

        globals.define("Hls", json!(true));
        let outcome = waiter.step(start + Duration::from_millis(200));
        assert_eq!(outcome.unwrap().unwrap(), json!(true));
        assert_eq!(waiter.state(), PollState::Resolved);
    }

    #[test]
    fn test_settled_waiter_is_final() {
        let globals = MemoryGlobals::new();
        let mut waiter = GlobalWaiter::new(&globals, request("Hls", 50), Duration::from_millis(100));
        let start = Instant::now();

        waiter.step(start);
        let outcome = waiter.step(start + Duration::from_millis(100)).unwrap();
        assert!(matches!(outcome, Err(Error::Timeout { .. })));
        assert_eq!(waiter.state(), PollState::Rejected);

        globals.define("Hls", json!(true));
        assert!(waiter.step(start + Duration::from_millis(200)).is_none());
        assert_eq!(waiter.state(), PollState::Rejected);
    }

    #[test]
    fn test_deadline_is_strict() {
        let globals = MemoryGlobals::new();
        let mut waiter = GlobalWaiter::new(&globals, request("Hls", 100), Duration::from_millis(100));
        let start = Instant::now();

        waiter.step(start);
        // Exactly at the deadline is not past it
        assert!(waiter.step(start + Duration::from_millis(100)).is_none());
        assert!(waiter.step(start + Duration::from_millis(200)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_resolves_when_defined_later() {
        let globals = std::sync::Arc::new(MemoryGlobals::new());
        let publisher = globals.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(250)).await;
            publisher.define("videojs", json!("fn"));
        });

        let start = Instant::now();
        let waiter = GlobalWaiter::new(&*globals, request("videojs", 1_000), Duration::from_millis(100));
        let value = waiter.run().await.unwrap();

        assert_eq!(value, json!("fn"));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed <= Duration::from_millis(300));
    }
}
