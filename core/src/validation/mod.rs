//! Result verification and benchmarking
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod benchmarks;
pub mod correctness;

pub use self::benchmarks::{parse_algorithms, BenchmarkEntry, BenchmarkSequence, EntryStatus};
pub use self::correctness::{AuditReport, RunStatus, VerificationAuditor};
