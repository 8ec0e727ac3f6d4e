//! Tabu search (Hertz and de Werra, 1987)
//!
//! Every iteration scans all recolorings of conflicting nodes and takes
//! the best admissible one. Undoing a move, i.e. giving a node back its
//! previous color, is tabu for `tenure` iterations unless it would beat
//! the best conflict count seen so far.

use crate::algorithm::metaheuristic::{random_coloring, MoveEvaluator};
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::config::RunParams;
use crate::data_structures::coloring::Color;
use crate::execution::context::{RunContext, Snapshot};

#[derive(Debug, Clone)]
pub struct TabuSearch {
    tenure: u64,
}

impl TabuSearch {
    pub fn new(tenure: u64) -> Self {
        Self { tenure }
    }

    pub fn from_params(params: &RunParams) -> Self {
        Self::new(params.tabu_tenure)
    }
}

impl ColoringStrategy for TabuSearch {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::TabuSearch
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        if n == 0 {
            return Ok(AttemptOutcome::Solved);
        }

        let k = ctx.color_budget();
        let width = k as usize + 1;
        ctx.coloring = random_coloring(ctx.rng(), n, k);
        let mut evaluator = MoveEvaluator::new(graph, &ctx.coloring);
        ctx.record_live(evaluator.total());

        // tabu_until[u * width + c]: first iteration at which u may return to c
        let mut tabu_until = vec![0u64; n * width];
        let mut iteration = 0u64;

        while evaluator.total() > 0 {
            ctx.tick(Snapshot::Best)?;
            if ctx.stagnated() {
                return Ok(AttemptOutcome::Stagnated);
            }

            let current = evaluator.total() as isize;
            let best_seen = ctx.best_conflicts().map_or(current, |best| best as isize);

            let mut chosen: Option<(usize, Color, isize)> = None;
            for u in evaluator.conflicting_nodes() {
                let old = ctx.coloring.get(u);
                for color in 1..=k {
                    if color == old {
                        continue;
                    }
                    let delta = evaluator.delta(&ctx.coloring, u, color);
                    let is_tabu = tabu_until[u * width + color as usize] > iteration;
                    let aspires = current + delta < best_seen;
                    if is_tabu && !aspires {
                        continue;
                    }
                    if chosen.map_or(true, |(_, _, best)| delta < best) {
                        chosen = Some((u, color, delta));
                    }
                }
            }

            let Some((u, color, _)) = chosen else {
                return Ok(AttemptOutcome::Exhausted);
            };
            let old = ctx.coloring.get(u);
            evaluator.apply(&mut ctx.coloring, u, color);
            tabu_until[u * width + old as usize] = iteration + self.tenure;
            ctx.record_live(evaluator.total());
            iteration += 1;
        }

        Ok(AttemptOutcome::Solved)
    }
}
