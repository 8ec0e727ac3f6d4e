//! Sequential benchmark runner
//!
//! Runs a list of strategies one after another on the same graph and
//! parameters, each in its own isolated run, and collects one entry per
//! strategy. Runs never overlap so timings stay comparable.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::thread;
use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmId, Result};
use crate::config::{EngineOptions, RunParams};
use crate::data_structures::graph::GraphInput;
use crate::execution::progress::{millis, RunEvent};
use crate::execution::runner::{ColoringEngine, RunRequest};
use crate::validation::correctness::RunStatus;

/// Outcome of one benchmarked run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryStatus {
    Finished(RunStatus),
    Errored { error: String },
}

/// One row of a benchmark table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    pub name: String,
    pub algorithm: AlgorithmId,
    #[serde(rename = "elapsedTime")]
    pub elapsed_ms: f64,
    pub colors_used: usize,
    pub status: EntryStatus,
}

/// Parse a comma-separated list of algorithm identifiers
pub fn parse_algorithms(list: &str) -> Result<Vec<AlgorithmId>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Strategies to benchmark plus the engine that runs them
#[derive(Debug, Clone)]
pub struct BenchmarkSequence {
    engine: ColoringEngine,
    algorithms: Vec<AlgorithmId>,
    pause: Duration,
}

impl BenchmarkSequence {
    /// Pacing is always disabled for benchmarks
    pub fn new(algorithms: Vec<AlgorithmId>, options: EngineOptions) -> Self {
        let options = EngineOptions {
            pacing: None,
            ..options
        };
        Self {
            engine: ColoringEngine::new(options),
            algorithms,
            pause: Duration::ZERO,
        }
    }

    /// Idle time between consecutive runs
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn algorithms(&self) -> &[AlgorithmId] {
        &self.algorithms
    }

    /// Run every strategy in order
    pub fn run(&self, graph: &GraphInput, params: &RunParams) -> Vec<BenchmarkEntry> {
        let mut entries = Vec::with_capacity(self.algorithms.len());
        for (index, &algorithm) in self.algorithms.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                thread::sleep(self.pause);
            }
            let entry = self.run_one(algorithm, graph, params);
            info!(
                "Benchmark {}: {:.1} ms, {} colors",
                entry.name, entry.elapsed_ms, entry.colors_used
            );
            entries.push(entry);
        }
        entries
    }

    fn run_one(&self, algorithm: AlgorithmId, graph: &GraphInput, params: &RunParams) -> BenchmarkEntry {
        let started = Instant::now();
        let request = RunRequest::new(algorithm, graph.clone(), params.clone());
        let terminal = self.engine.run(request);

        let (elapsed_ms, colors_used, status) = match terminal {
            RunEvent::Done {
                status, metrics, ..
            } => (metrics.time_ms, metrics.colors_used, EntryStatus::Finished(status)),
            RunEvent::Error { message } => (
                millis(started.elapsed()),
                0,
                EntryStatus::Errored { error: message },
            ),
            RunEvent::Step { .. } => (
                millis(started.elapsed()),
                0,
                EntryStatus::Errored {
                    error: "run ended without a terminal event".into(),
                },
            ),
        };

        BenchmarkEntry {
            name: algorithm.display_name().to_owned(),
            algorithm,
            elapsed_ms,
            colors_used,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_list() {
        let ids = parse_algorithms("dSatur, rlf,,tabuSearch").unwrap();
        assert_eq!(
            ids,
            vec![AlgorithmId::DSatur, AlgorithmId::Rlf, AlgorithmId::TabuSearch]
        );
        assert!(parse_algorithms("dSatur,nope").is_err());
    }

    #[test]
    fn test_constructive_benchmark_runs_in_order() {
        let graph = GraphInput::new(4, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        let sequence = BenchmarkSequence::new(
            vec![AlgorithmId::BasicGreedy, AlgorithmId::WelshPowell, AlgorithmId::DSatur],
            EngineOptions::benchmark(),
        );
        let entries = sequence.run(&graph, &RunParams::default().with_time_limit(5.0));

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Basic Greedy");
        for entry in &entries {
            assert_eq!(entry.status, EntryStatus::Finished(RunStatus::Completed));
            assert_eq!(entry.colors_used, 2);
        }
    }
}
