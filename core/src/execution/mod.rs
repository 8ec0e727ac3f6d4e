//! Execution layer: time budgets, stagnation detection, progress reporting,
//! the escalation driver and the run boundary
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod budget;
pub mod context;
pub mod driver;
pub mod progress;
pub mod runner;
pub mod stagnation;

pub use self::budget::{CancellationToken, Deadline, TimeBudget};
pub use self::context::{RunContext, Snapshot};
pub use self::driver::{DriverReport, EscalationDriver};
pub use self::progress::{ProgressReporter, RunEvent};
pub use self::runner::{ColoringEngine, RunHandle, RunRequest};
pub use self::stagnation::{StagnationMonitor, StagnationVerdict};
