//! Progress events and the throttled reporter
//!
//! Events are the only thing that leaves a running worker. They carry
//! external node identifiers, never dense indices, so consumers can map
//! them straight onto whatever they rendered.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::EngineOptions;
use crate::data_structures::coloring::{Color, Coloring, ConflictAnalyzer};
use crate::data_structures::graph::{ExternalId, Graph, NodeMapping};
use crate::validation::correctness::RunStatus;

/// Metrics attached to a progress step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetrics {
    pub iter: u64,
    pub conflicts: usize,
    /// Milliseconds since the run started
    #[serde(rename = "time")]
    pub time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Metrics attached to the terminal event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoneMetrics {
    #[serde(rename = "time")]
    pub time_ms: f64,
    pub colors_used: usize,
    pub conflicts: usize,
}

/// Event stream of a single run; exactly one terminal event closes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunEvent {
    #[serde(rename_all = "camelCase")]
    Step {
        iteration: u64,
        coloring_by_external_id: BTreeMap<ExternalId, Color>,
        conflicting_edges_by_external_id: Vec<(ExternalId, ExternalId)>,
        metrics: StepMetrics,
    },
    #[serde(rename_all = "camelCase")]
    Done {
        status: RunStatus,
        metrics: DoneMetrics,
        final_coloring: BTreeMap<ExternalId, Color>,
        final_conflict_edges: Vec<(ExternalId, ExternalId)>,
    },
    Error {
        message: String,
    },
}

impl RunEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunEvent::Step { .. })
    }
}

/// Colored nodes keyed by external identifier
pub(crate) fn external_coloring(mapping: &NodeMapping, coloring: &Coloring) -> BTreeMap<ExternalId, Color> {
    coloring
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, &color)| color != 0)
        .map(|(u, &color)| (mapping.external(u), color))
        .collect()
}

pub(crate) fn external_edges(mapping: &NodeMapping, edges: &[(usize, usize)]) -> Vec<(ExternalId, ExternalId)> {
    edges
        .iter()
        .map(|&(u, v)| (mapping.external(u), mapping.external(v)))
        .collect()
}

pub(crate) fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

/// Throttled, monotone step emitter
///
/// Iterations restart at zero in every attempt; the reporter offsets them so
/// the emitted sequence never decreases across escalations.
#[derive(Debug)]
pub struct ProgressReporter {
    sink: Option<Sender<RunEvent>>,
    mapping: Arc<NodeMapping>,
    started: Instant,
    report_every: u64,
    pacing: Option<Duration>,
    attempt_base: u64,
    last_iteration: u64,
    last_emitted: Option<u64>,
    best_reported: Option<usize>,
    emitted: u64,
}

impl ProgressReporter {
    pub fn new(
        sink: Option<Sender<RunEvent>>,
        mapping: Arc<NodeMapping>,
        options: &EngineOptions,
        started: Instant,
    ) -> Self {
        Self {
            sink,
            mapping,
            started,
            report_every: options.report_every.max(1),
            pacing: options.pacing,
            attempt_base: 0,
            last_iteration: 0,
            last_emitted: None,
            best_reported: None,
            emitted: 0,
        }
    }

    /// Reporter that only counts; used when nobody is listening
    pub fn silent(node_count: usize) -> Self {
        Self::new(
            None,
            Arc::new(NodeMapping::identity(node_count)),
            &EngineOptions::default(),
            Instant::now(),
        )
    }

    /// Start a new attempt; local iteration numbers restart at zero
    pub fn begin_attempt(&mut self) {
        self.attempt_base = self.last_iteration;
        self.last_emitted = None;
        self.best_reported = None;
    }

    /// Number of step events produced so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the cadence calls for a step at this local iteration
    pub fn is_due(&self, local_iteration: u64) -> bool {
        match self.last_emitted {
            None => true,
            Some(last) => local_iteration.saturating_sub(last) >= self.report_every,
        }
    }

    /// Whether `conflicts` beats everything reported this attempt
    pub fn is_improvement(&self, conflicts: usize) -> bool {
        self.best_reported.map_or(true, |best| conflicts < best)
    }

    /// Emit a step for `coloring`; conflicts are recomputed here
    pub fn step(
        &mut self,
        graph: &Graph,
        local_iteration: u64,
        coloring: &Coloring,
        status: Option<String>,
    ) {
        let iteration = (self.attempt_base + local_iteration).max(self.last_iteration);
        self.last_iteration = iteration;
        self.last_emitted = Some(local_iteration);

        let report = ConflictAnalyzer::new(graph).evaluate(coloring);
        if self.is_improvement(report.count) {
            self.best_reported = Some(report.count);
        }

        let event = RunEvent::Step {
            iteration,
            coloring_by_external_id: external_coloring(&self.mapping, coloring),
            conflicting_edges_by_external_id: external_edges(&self.mapping, &report.edges),
            metrics: StepMetrics {
                iter: iteration,
                conflicts: report.count,
                time_ms: millis(self.elapsed()),
                status,
            },
        };
        self.emitted += 1;
        self.send(event);

        if let Some(pause) = self.pacing {
            thread::sleep(pause);
        }
    }

    /// Advance the iteration counter without emitting
    pub fn advance(&mut self, local_iteration: u64) {
        self.last_iteration = self.last_iteration.max(self.attempt_base + local_iteration);
    }

    pub fn send(&self, event: RunEvent) {
        if let Some(sink) = &self.sink {
            if sink.send(event).is_err() {
                trace!("Progress receiver is gone; dropping event");
            }
        }
    }
}
