//! Wall-clock deadlines and cooperative cancellation
//!
//! A run carries exactly one [`Deadline`], fixed when the run is spawned;
//! every attempt and every solver sub-call measures against it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::algorithm::traits::{ColoringError, Result};

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Fixed point in time a run must finish by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn starting_now(limit: Duration) -> Self {
        Self::starting_at(Instant::now(), limit)
    }

    pub fn starting_at(start: Instant, limit: Duration) -> Self {
        Self { start, limit }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    pub fn is_exceeded(&self) -> bool {
        self.elapsed() >= self.limit
    }
}

/// Deadline plus cancellation, checked at strategy checkpoints
#[derive(Debug, Clone)]
pub struct TimeBudget {
    deadline: Deadline,
    token: CancellationToken,
}

impl TimeBudget {
    pub fn new(deadline: Deadline, token: CancellationToken) -> Self {
        Self { deadline, token }
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// `Err` once the run was cancelled or the deadline passed
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(ColoringError::Cancelled);
        }
        if self.deadline.is_exceeded() {
            return Err(ColoringError::SoftTimeExceeded {
                elapsed: self.deadline.elapsed(),
            });
        }
        Ok(())
    }

    /// Time a nested call may use: `cap`, clipped to what is left
    pub fn sub_limit(&self, cap: Duration) -> Duration {
        cap.min(self.deadline.remaining())
    }
}
