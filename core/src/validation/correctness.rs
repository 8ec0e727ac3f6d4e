//! Post-run correctness verification
//!
//! The auditor trusts nothing a strategy reports. It recomputes conflicts
//! from scratch, completes partial colorings and derives the run status
//! from ground truth alone.
//!
//! # Auto-fill
//! Uncolored nodes are visited in index order and given the
//! least-conflicting color from the palette in use. When even that color
//! conflicts, a fresh color extends the palette, so auto-fill never adds
//! conflicts of its own.

use std::fmt::{self, Display};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::ColoringError;
use crate::data_structures::coloring::{Coloring, ConflictAnalyzer, ConflictReport};
use crate::data_structures::graph::Graph;

/// Final verdict of a run
///
/// Serialized as its display form, e.g. `"Completed (Auto-filled)"` or
/// `"Failed: 3 conflicts"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RunStatus {
    Completed,
    CompletedAutoFilled,
    Failed { conflicts: usize },
    LimitReached,
}

impl RunStatus {
    /// Whether the final coloring is proper
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::CompletedAutoFilled)
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => f.write_str("Completed"),
            RunStatus::CompletedAutoFilled => f.write_str("Completed (Auto-filled)"),
            RunStatus::Failed { conflicts } => write!(f, "Failed: {} conflicts", conflicts),
            RunStatus::LimitReached => f.write_str("Limit Reached"),
        }
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for RunStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Completed" => Ok(RunStatus::Completed),
            "Completed (Auto-filled)" => Ok(RunStatus::CompletedAutoFilled),
            "Limit Reached" => Ok(RunStatus::LimitReached),
            other => other
                .strip_prefix("Failed: ")
                .and_then(|rest| rest.strip_suffix(" conflicts"))
                .and_then(|count| count.parse().ok())
                .map(|conflicts| RunStatus::Failed { conflicts })
                .ok_or_else(|| format!("unrecognized run status: {}", other)),
        }
    }
}

/// Ground-truth summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub status: RunStatus,
    /// Complete coloring after auto-fill
    pub coloring: Coloring,
    pub conflicts: ConflictReport,
    pub colors_used: usize,
    /// Nodes that were uncolored before auto-fill
    pub auto_filled: Vec<usize>,
    /// Set when the strategy claimed success but the audit disagrees
    pub violation: Option<ColoringError>,
}

/// Independent verifier for strategy output
#[derive(Debug, Clone, Copy)]
pub struct VerificationAuditor<'g> {
    graph: &'g Graph,
    analyzer: ConflictAnalyzer<'g>,
}

impl<'g> VerificationAuditor<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            analyzer: ConflictAnalyzer::new(graph),
        }
    }

    /// Audit a coloring. `claimed_success` is the strategy's own verdict;
    /// `limit_reached` tells whether the deadline cut the run short.
    pub fn audit(&self, coloring: Coloring, claimed_success: bool, limit_reached: bool) -> AuditReport {
        let mut coloring = coloring;
        let uncolored: Vec<usize> = coloring.uncolored().collect();
        let before = self.analyzer.evaluate(&coloring);

        let violation = if claimed_success && (!before.is_clean() || !uncolored.is_empty()) {
            warn!(
                "Claimed solution has {} conflict(s) and {} uncolored node(s)",
                before.count,
                uncolored.len()
            );
            Some(ColoringError::PostRunInvariantViolation {
                conflicts: before.count,
                uncolored: uncolored.len(),
            })
        } else {
            None
        };

        let conflicts = if uncolored.is_empty() {
            before
        } else {
            self.fill(&mut coloring, &uncolored);
            debug!("Auto-filled {} node(s)", uncolored.len());
            self.analyzer.evaluate(&coloring)
        };

        let status = if conflicts.is_clean() {
            if uncolored.is_empty() {
                RunStatus::Completed
            } else {
                RunStatus::CompletedAutoFilled
            }
        } else if limit_reached {
            RunStatus::LimitReached
        } else {
            RunStatus::Failed {
                conflicts: conflicts.count,
            }
        };

        AuditReport {
            status,
            colors_used: coloring.colors_used(),
            coloring,
            conflicts,
            auto_filled: uncolored,
            violation,
        }
    }

    fn fill(&self, coloring: &mut Coloring, nodes: &[usize]) {
        let mut palette = coloring.max_color().max(1);
        for &u in nodes {
            let color = coloring.least_conflicting_color(self.graph, u, palette);
            if coloring.neighbors_with_color(self.graph, u, color) == 0 {
                coloring.set(u, color);
            } else {
                palette += 1;
                coloring.set(u, palette);
            }
        }
    }
}
