//! Exact search strategies
//!
//! Complete depth-first searches over color assignments. Each attempt
//! runs against a fixed color budget `k` and a step budget; the driver
//! raises both when an attempt comes back empty-handed.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod branch_and_bound;
mod brute_force;

pub use self::branch_and_bound::BranchAndBound;
pub use self::brute_force::BruteForce;
