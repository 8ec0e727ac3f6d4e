//! Genetic algorithm over complete colorings
//!
//! Fitness is the conflict count (lower is better) and is evaluated for
//! the whole population in parallel. Each generation keeps the two best
//! individuals and fills the rest with one-point crossover children of a
//! binary-tournament parent and a uniformly drawn parent, mutated with a
//! small probability.

use rand::Rng;
use rayon::prelude::*;

use crate::algorithm::metaheuristic::random_coloring;
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::config::RunParams;
use crate::data_structures::coloring::{Coloring, ConflictAnalyzer};
use crate::execution::context::{RunContext, Snapshot};

const ELITES: usize = 2;
const MUTATION_RATE: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    population: usize,
    /// Generation cap per attempt; `0` is unbounded
    generations: usize,
    mutation_rate: f64,
}

impl GeneticAlgorithm {
    pub fn new(population: usize, generations: usize) -> Self {
        Self {
            population: population.max(ELITES),
            generations,
            mutation_rate: MUTATION_RATE,
        }
    }

    pub fn from_params(params: &RunParams) -> Self {
        Self::new(params.population, params.generations)
    }
}

fn evaluate(analyzer: &ConflictAnalyzer<'_>, population: &[Coloring]) -> Vec<usize> {
    population
        .par_iter()
        .map(|individual| analyzer.count(individual))
        .collect()
}

impl ColoringStrategy for GeneticAlgorithm {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::GeneticAlgorithm
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        if n == 0 {
            return Ok(AttemptOutcome::Solved);
        }

        let k = ctx.color_budget();
        let size = self.population;
        let analyzer = ConflictAnalyzer::new(graph);

        let mut population: Vec<Coloring> = (0..size).map(|_| random_coloring(ctx.rng(), n, k)).collect();
        let mut scores = evaluate(&analyzer, &population);
        let mut generation = 0usize;

        loop {
            let mut ranking: Vec<usize> = (0..size).collect();
            ranking.sort_by_key(|&i| scores[i]);
            let leader = ranking[0];
            ctx.record_candidate(&population[leader], scores[leader]);

            if scores[leader] == 0 {
                return Ok(AttemptOutcome::Solved);
            }
            ctx.tick(Snapshot::Best)?;
            if ctx.stagnated() {
                return Ok(AttemptOutcome::Stagnated);
            }
            if self.generations > 0 && generation >= self.generations {
                return Ok(AttemptOutcome::Exhausted);
            }

            let mut next: Vec<Coloring> = ranking[..ELITES].iter().map(|&i| population[i].clone()).collect();
            let rng = ctx.rng();
            while next.len() < size {
                let (a, b) = (rng.gen_range(0..size), rng.gen_range(0..size));
                let first = if scores[a] < scores[b] { a } else { b };
                let second = rng.gen_range(0..size);
                let cut = rng.gen_range(0..n);

                let mut genes = Vec::with_capacity(n);
                genes.extend_from_slice(&population[first].as_slice()[..cut]);
                genes.extend_from_slice(&population[second].as_slice()[cut..]);
                let mut child = Coloring::from_vec(genes);

                if rng.gen::<f64>() < self.mutation_rate {
                    let u = rng.gen_range(0..n);
                    child.set(u, rng.gen_range(1..=k));
                }
                next.push(child);
            }

            population = next;
            scores = evaluate(&analyzer, &population);
            generation += 1;
        }
    }
}
