//! Ant colony optimization
//!
//! Each ant colors the nodes in index order. For node `u` and color `c`
//! the attractiveness is `τ[u][c]^α · η^β` with `η = 1 / (1 + conflicts)`
//! against the nodes that ant already colored. With probability `q0` the
//! ant exploits the most attractive color, otherwise it samples
//! proportionally. After all ants ran, pheromone evaporates everywhere
//! and the iteration-best ant deposits `1 / (1 + conflicts)` on its
//! choices.

use rand::Rng;

use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::config::RunParams;
use crate::data_structures::coloring::{Color, Coloring, ConflictAnalyzer};
use crate::execution::context::{RunContext, Snapshot};

const MAX_ANTS: usize = 20;

#[derive(Debug, Clone)]
pub struct AntColony {
    alpha: f64,
    beta: f64,
    evaporation: f64,
    exploitation: f64,
    initial_pheromone: f64,
    ants: Option<usize>,
}

impl Default for AntColony {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 2.0,
            evaporation: 0.1,
            exploitation: 0.9,
            initial_pheromone: 0.1,
            ants: None,
        }
    }
}

impl AntColony {
    pub fn from_params(params: &RunParams) -> Self {
        Self {
            ants: params.ants,
            ..Self::default()
        }
    }

    fn colony_size(&self, node_count: usize) -> usize {
        self.ants.unwrap_or(MAX_ANTS.min(node_count / 2)).max(1)
    }
}

impl ColoringStrategy for AntColony {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::AntColony
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        if n == 0 {
            return Ok(AttemptOutcome::Solved);
        }

        let k = ctx.color_budget();
        let width = k as usize + 1;
        let ants = self.colony_size(n);
        let analyzer = ConflictAnalyzer::new(graph);

        let mut pheromone = vec![self.initial_pheromone; n * width];
        let mut weights = vec![0.0f64; width];
        let mut ant = Coloring::new(n);

        loop {
            ctx.tick(Snapshot::Best)?;
            if ctx.stagnated() {
                return Ok(AttemptOutcome::Stagnated);
            }

            let mut iteration_best: Option<(Coloring, usize)> = None;
            let rng = ctx.rng();
            for _ in 0..ants {
                ant.reset();
                for u in 0..n {
                    let mut total = 0.0;
                    for c in 1..=k {
                        let eta = 1.0 / (1.0 + ant.neighbors_with_color(graph, u, c) as f64);
                        let weight = pheromone[u * width + c as usize].powf(self.alpha) * eta.powf(self.beta);
                        weights[c as usize] = weight;
                        total += weight;
                    }

                    let exploit = rng.gen::<f64>() < self.exploitation || total <= 0.0;
                    let choice = if exploit {
                        strongest(&weights[1..])
                    } else {
                        roulette(&weights[1..], rng.gen::<f64>() * total)
                    };
                    ant.set(u, choice);
                }

                let conflicts = analyzer.count(&ant);
                if iteration_best.as_ref().map_or(true, |(_, best)| conflicts < *best) {
                    iteration_best = Some((ant.clone(), conflicts));
                }
            }

            for trail in pheromone.iter_mut() {
                *trail *= 1.0 - self.evaporation;
            }

            if let Some((best, conflicts)) = iteration_best {
                let deposit = 1.0 / (1.0 + conflicts as f64);
                for u in 0..n {
                    pheromone[u * width + best.get(u) as usize] += deposit;
                }
                ctx.record_candidate(&best, conflicts);
                if conflicts == 0 {
                    return Ok(AttemptOutcome::Solved);
                }
            }
        }
    }
}

/// First color of maximal weight; `weights[i]` belongs to color `i + 1`
fn strongest(weights: &[f64]) -> Color {
    let mut best = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w > weights[best] {
            best = i;
        }
    }
    best as Color + 1
}

/// Color whose cumulative weight first reaches `target`
fn roulette(weights: &[f64], target: f64) -> Color {
    let mut remaining = target;
    for (i, &w) in weights.iter().enumerate() {
        remaining -= w;
        if remaining <= 0.0 {
            return i as Color + 1;
        }
    }
    weights.len() as Color
}
