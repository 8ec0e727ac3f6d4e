//! Solver seam for the coloring program
//!
//! [`IlpSolver`] is the only thing the reduction loop knows about a
//! solver. The bundled [`MicroLpSolver`] runs good_lp's pure-Rust microlp
//! backend on the calling thread under microlp's own time limit, so a
//! solve never outlives the call that started it.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use good_lp::solvers::microlp::microlp;
use good_lp::{
    variable, Expression, IntoAffineExpression, ProblemVariables, ResolutionError, Solution,
    SolutionStatus, SolverModel, Variable, WithTimeLimit,
};
use log::{debug, trace};

use crate::algorithm::ilp::model::IlpModel;
use crate::algorithm::traits::{ColoringError, Result};

/// Raw answer of a solver
#[derive(Debug, Clone, PartialEq)]
pub enum IlpSolution {
    /// Values of every variable, in model order
    Feasible(Vec<f64>),
    Infeasible,
}

pub trait IlpSolver: Debug + Send {
    /// Solve `model`, giving up after `time_limit`
    fn solve(&self, model: &IlpModel, time_limit: Duration) -> Result<IlpSolution>;
}

/// good_lp with the microlp backend
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl IlpSolver for MicroLpSolver {
    fn solve(&self, model: &IlpModel, time_limit: Duration) -> Result<IlpSolution> {
        let started = Instant::now();
        let result = solve_with_microlp(model, time_limit);
        if let Err(ColoringError::SoftTimeExceeded { .. }) = &result {
            debug!(
                "ILP solve at k={} gave up after {:?}",
                model.colors(),
                started.elapsed()
            );
        }
        result
    }
}

fn solve_with_microlp(model: &IlpModel, time_limit: Duration) -> Result<IlpSolution> {
    let mut vars = ProblemVariables::new();
    let x: Vec<Variable> = (0..model.variable_count())
        .map(|_| vars.add(variable().binary()))
        .collect();

    let objective: Expression = 0.into();
    let mut problem = vars
        .minimise(objective)
        .using(microlp)
        .with_time_limit(time_limit.as_secs_f64());

    for node in 0..model.node_count() {
        let mut assigned: Expression = 0.into();
        for color in 1..=model.colors() {
            assigned += x[model.variable_index(node, color)];
        }
        problem.add_constraint(assigned.eq(1.0));
    }

    for &(u, v) in model.edges() {
        for color in 1..=model.colors() {
            let mut shared: Expression = 0.into();
            shared += x[model.variable_index(u, color)];
            shared += x[model.variable_index(v, color)];
            problem.add_constraint(shared.leq(1.0));
        }
    }

    trace!(
        "Solving {} variables, {} nodes, {} edges at k={}",
        x.len(),
        model.node_count(),
        model.edges().len(),
        model.colors()
    );

    // any feasible point is optimal for the zero objective, so an incumbent
    // found before the limit is as good as a proof
    match problem.solve() {
        Ok(solution) => {
            if let SolutionStatus::TimeLimit = solution.status() {
                trace!("Incumbent accepted at the time limit");
            }
            Ok(IlpSolution::Feasible(
                x.iter().map(|&var| solution.value(var)).collect(),
            ))
        }
        Err(ResolutionError::Infeasible) => Ok(IlpSolution::Infeasible),
        Err(ResolutionError::Other(_)) => Err(ColoringError::SoftTimeExceeded {
            elapsed: time_limit,
        }),
        Err(e) => Err(ColoringError::Solver(e.to_string())),
    }
}
