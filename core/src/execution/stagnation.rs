//! Stagnation detection for stochastic strategies
//!
//! Every window the best conflict count is compared against the value at
//! the start of the window. Higher conflict counts demand larger
//! improvements before the search is considered to be making progress.

use std::time::{Duration, Instant};

/// Required improvement per window for a window-start conflict count
pub fn improvement_threshold(conflicts: usize) -> usize {
    match conflicts {
        c if c > 100 => 5,
        c if c > 80 => 4,
        c if c > 50 => 3,
        c if c > 20 => 2,
        _ => 1,
    }
}

/// Result of a stagnation observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagnationVerdict {
    Progressing,
    Stagnated { improvement: usize, threshold: usize },
}

/// Sliding-window progress tracker
#[derive(Debug, Clone)]
pub struct StagnationMonitor {
    window: Duration,
    window_start: Instant,
    reference: Option<usize>,
}

impl StagnationMonitor {
    pub fn new(window: Duration) -> Self {
        Self::starting_at(window, Instant::now())
    }

    pub fn starting_at(window: Duration, now: Instant) -> Self {
        Self {
            window,
            window_start: now,
            reference: None,
        }
    }

    pub fn observe(&mut self, best: usize) -> StagnationVerdict {
        self.observe_at(best, Instant::now())
    }

    /// Observe with an explicit clock reading
    pub fn observe_at(&mut self, best: usize, now: Instant) -> StagnationVerdict {
        let reference = *self.reference.get_or_insert(best);
        if now.duration_since(self.window_start) < self.window {
            return StagnationVerdict::Progressing;
        }

        let threshold = improvement_threshold(reference);
        let improvement = reference.saturating_sub(best);
        if improvement < threshold {
            return StagnationVerdict::Stagnated {
                improvement,
                threshold,
            };
        }

        self.reference = Some(best);
        self.window_start = now;
        StagnationVerdict::Progressing
    }
}
