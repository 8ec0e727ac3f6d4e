//! ILP-assisted coloring
//!
//! A greedy pass gives a proper coloring with `k0` colors. The reduction
//! loop then asks the solver for a coloring with one color fewer, again
//! and again, keeping the last proven coloring. Infeasibility, an
//! unreadable answer or an exhausted time slice all end the reduction the
//! same way.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod model;
mod solver;

pub use self::model::IlpModel;
pub use self::solver::{IlpSolution, IlpSolver, MicroLpSolver};

use std::time::Duration;

use log::debug;

use crate::algorithm::greedy::color_in_order;
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringError, ColoringStrategy, Result};
use crate::data_structures::coloring::{Coloring, ConflictAnalyzer};
use crate::execution::context::RunContext;

#[derive(Debug, Clone)]
pub struct IlpReduction<S: IlpSolver> {
    solver: S,
    solve_limit: Duration,
}

impl<S: IlpSolver> IlpReduction<S> {
    /// `solve_limit` caps each solver call; the run deadline caps it further
    pub fn new(solver: S, solve_limit: Duration) -> Self {
        Self {
            solver,
            solve_limit,
        }
    }

    fn prove(&self, model: &IlpModel, limit: Duration, analyzer: &ConflictAnalyzer<'_>) -> Result<Coloring> {
        let coloring = match self.solver.solve(model, limit)? {
            IlpSolution::Feasible(values) => model.decode(&values)?,
            IlpSolution::Infeasible => return Err(ColoringError::SolverInfeasible),
        };

        let conflicts = analyzer.count(&coloring);
        if conflicts > 0 {
            return Err(ColoringError::ResultParseFailure(format!(
                "solver coloring has {} conflict(s)",
                conflicts
            )));
        }
        Ok(coloring)
    }
}

impl<S: IlpSolver> ColoringStrategy for IlpReduction<S> {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Ilp
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        let analyzer = ConflictAnalyzer::new(graph);

        color_in_order(ctx, 0..n)?;
        let seed_conflicts = analyzer.count(&ctx.coloring);
        ctx.record_live(seed_conflicts);
        let mut proven = ctx.coloring.max_color();
        ctx.status(format!("Greedy seed uses {} colors", proven));

        while proven > 1 {
            ctx.checkpoint()?;
            let target = proven - 1;
            let limit = ctx.time_budget().sub_limit(self.solve_limit);
            if limit.is_zero() {
                break;
            }

            ctx.status(format!("Proving {}-colorability", target));
            let model = IlpModel::build(graph, target);
            match self.prove(&model, limit, &analyzer) {
                Ok(coloring) => {
                    ctx.coloring = coloring;
                    ctx.replace_best(0);
                    proven = target;
                }
                Err(e) => {
                    debug!("Reduction stops at k={}: {}", proven, e);
                    ctx.status(format!("Keeping {} colors: {}", proven, e));
                    break;
                }
            }
        }

        Ok(AttemptOutcome::Solved)
    }
}
