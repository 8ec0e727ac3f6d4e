//! Run boundary and watchdog
//!
//! Every run executes on its own worker thread and talks to the caller
//! only through an event channel. The [`RunHandle`] doubles as the
//! watchdog: if no terminal event arrives within the time limit plus the
//! grace period, the worker is cancelled and detached and the caller gets
//! a single `WatchdogKilled` error as the terminal event.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{self, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithm::create_strategy;
use crate::algorithm::traits::{AlgorithmId, ColoringError, Result};
use crate::config::{EngineOptions, RunParams};
use crate::data_structures::graph::{Graph, GraphInput};
use crate::execution::budget::{CancellationToken, Deadline};
use crate::execution::driver::EscalationDriver;
use crate::execution::progress::{external_coloring, external_edges, millis, DoneMetrics, ProgressReporter, RunEvent};
use crate::validation::correctness::VerificationAuditor;

static RUN_SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Watchdog horizon for limits too large to represent as an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A request crossing the run boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Wire identifier of the strategy
    pub algorithm: String,
    pub graph: GraphInput,
    #[serde(default)]
    pub params: RunParams,
}

impl RunRequest {
    pub fn new(algorithm: AlgorithmId, graph: GraphInput, params: RunParams) -> Self {
        Self {
            algorithm: algorithm.as_str().to_owned(),
            graph,
            params,
        }
    }
}

/// Spawns isolated runs
#[derive(Debug, Clone, Default)]
pub struct ColoringEngine {
    options: EngineOptions,
}

impl ColoringEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Start a run on a dedicated worker thread
    pub fn spawn(&self, request: RunRequest) -> RunHandle {
        let id = Uuid::new_v4();
        let sequence = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let limit = request.params.time_limit_duration();
        let hard_limit = limit.saturating_add(self.options.grace_period);
        let deadline = Deadline::starting_now(limit);
        let (sender, receiver) = crossbeam_channel::unbounded();

        info!("Spawning run {} ({})", id, request.algorithm);

        let worker_sender = sender.clone();
        let worker_token = token.clone();
        let options = self.options.clone();
        let spawned = thread::Builder::new()
            .name(format!("chromatic-run-{}", sequence))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    execute(&request, &options, deadline, &worker_token, &worker_sender)
                }));
                let terminal = match outcome {
                    Ok(Ok(event)) => event,
                    Ok(Err(e)) => {
                        warn!("Run {} failed [{}]: {}", id, e.kind(), e);
                        RunEvent::Error {
                            message: e.to_string(),
                        }
                    }
                    Err(payload) => {
                        error!("Run {} panicked: {}", id, panic_message(payload.as_ref()));
                        RunEvent::Error {
                            message: ColoringError::Internal(panic_message(payload.as_ref()))
                                .to_string(),
                        }
                    }
                };
                let _ = worker_sender.send(terminal);
            });

        let worker = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Could not start worker thread: {}", e);
                let _ = sender.send(RunEvent::Error {
                    message: ColoringError::Internal(e.to_string()).to_string(),
                });
                None
            }
        };

        let now = Instant::now();
        RunHandle {
            id,
            events: receiver,
            token,
            hard_deadline: now.checked_add(hard_limit).unwrap_or(now + FAR_FUTURE),
            hard_limit,
            worker,
            finished: false,
        }
    }

    /// Spawn and block until the terminal event
    pub fn run(&self, request: RunRequest) -> RunEvent {
        self.spawn(request).wait()
    }
}

/// Caller side of a run: an iterator over its events that ends after the
/// terminal one
#[derive(Debug)]
pub struct RunHandle {
    id: Uuid,
    events: Receiver<RunEvent>,
    token: CancellationToken,
    hard_deadline: Instant,
    hard_limit: Duration,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl RunHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the worker to stop at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Next event, enforcing the watchdog deadline
    pub fn next_event(&mut self) -> Option<RunEvent> {
        if self.finished {
            return None;
        }

        let remaining = self.hard_deadline.saturating_duration_since(Instant::now());
        let event = match self.events.recv_timeout(remaining) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                warn!("Run {} exceeded {:?}; detaching worker", self.id, self.hard_limit);
                self.token.cancel();
                self.worker.take();
                RunEvent::Error {
                    message: ColoringError::WatchdogKilled {
                        limit: self.hard_limit,
                    }
                    .to_string(),
                }
            }
            Err(RecvTimeoutError::Disconnected) => RunEvent::Error {
                message: ColoringError::Internal("worker exited without a result".into()).to_string(),
            },
        };

        if event.is_terminal() {
            self.finished = true;
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    debug!("Worker of run {} panicked after reporting", self.id);
                }
            }
        }
        Some(event)
    }

    /// Drain to the terminal event
    pub fn wait(mut self) -> RunEvent {
        let mut last = None;
        while let Some(event) = self.next_event() {
            last = Some(event);
        }
        last.unwrap_or_else(|| RunEvent::Error {
            message: ColoringError::Internal("run produced no events".into()).to_string(),
        })
    }
}

impl Iterator for RunHandle {
    type Item = RunEvent;

    fn next(&mut self) -> Option<RunEvent> {
        self.next_event()
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        if !self.finished {
            self.token.cancel();
        }
    }
}

fn execute(
    request: &RunRequest,
    options: &EngineOptions,
    deadline: Deadline,
    token: &CancellationToken,
    sender: &Sender<RunEvent>,
) -> Result<RunEvent> {
    request.params.validate()?;
    let algorithm: AlgorithmId = request.algorithm.parse()?;
    let (graph, mapping) = Graph::from_input(&request.graph)?;
    let mapping = Arc::new(mapping);

    let mut reporter = ProgressReporter::new(
        Some(sender.clone()),
        Arc::clone(&mapping),
        options,
        deadline.start(),
    );
    let mut strategy = create_strategy(algorithm, &request.params, options);
    let driver = EscalationDriver::new(&graph, &request.params, options, deadline, token.clone());
    let report = driver.run(strategy.as_mut(), &mut reporter)?;

    let audit = VerificationAuditor::new(&graph).audit(report.coloring, report.solved, report.limit_reached);
    if let Some(violation) = &audit.violation {
        warn!("{} reported success but the audit disagrees: {}", algorithm, violation);
    }

    info!(
        "{} finished: {} with {} colors, {} conflict(s)",
        algorithm, audit.status, audit.colors_used, audit.conflicts.count
    );

    Ok(RunEvent::Done {
        metrics: DoneMetrics {
            time_ms: millis(deadline.elapsed()),
            colors_used: audit.colors_used,
            conflicts: audit.conflicts.count,
        },
        final_coloring: external_coloring(&mapping, &audit.coloring),
        final_conflict_edges: external_edges(&mapping, &audit.conflicts.edges),
        status: audit.status,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
