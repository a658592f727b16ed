//! Fixed-cadence poll scheduling
//!
//! The decision to poll again is re-derived from the latest snapshot's
//! `is_running` flag only. There is no tick count and no backoff.

use super::StatusSnapshot;
use std::future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Sleep, sleep};

/// Poll interval used by the dashboard
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Scheduler phase derived from the latest snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// No snapshot yet
    Idle,
    /// A remote run is in progress; fetch again after the interval
    Watching,
    /// The last run finished; wait for a manual action
    Settled,
}

impl PollPhase {
    pub fn of(snapshot: Option<&StatusSnapshot>) -> Self {
        match snapshot {
            None => PollPhase::Idle,
            Some(s) if s.is_running => PollPhase::Watching,
            Some(_) => PollPhase::Settled,
        }
    }
}

/// Holds at most one pending delayed fetch
pub struct PollScheduler {
    interval: Duration,
    pending: Option<Pin<Box<Sleep>>>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Re-evaluate from the latest snapshot.
    ///
    /// Any pending delay is dropped first; a fresh one is armed only while
    /// watching. The immediate fetch of the idle phase is the owner's job.
    pub fn rearm(&mut self, snapshot: Option<&StatusSnapshot>) -> PollPhase {
        self.disarm();
        let phase = PollPhase::of(snapshot);
        if phase == PollPhase::Watching {
            self.pending = Some(Box::pin(sleep(self.interval)));
        }
        phase
    }

    pub fn disarm(&mut self) {
        self.pending = None;
    }

    /// Resolves when the armed delay elapses, never when disarmed.
    ///
    /// Cancel safe: dropping the future keeps the deadline armed.
    pub async fn due(&mut self) {
        match self.pending.as_mut() {
            Some(delay) => {
                delay.as_mut().await;
                self.pending = None;
            }
            None => future::pending().await,
        }
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
