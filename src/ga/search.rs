//! Genetic search over topological task sequences.
//!
//! # Algorithm
//!
//! 1. Compute articulation points and closed recombination regions once.
//! 2. Seed the population with packed random topological sequences.
//! 3. Each generation, `population_size / 2` times: draw three distinct
//!    individuals, take the two most efficient as parents, recombine a
//!    random region with probability `crossover_probability`, mutate each
//!    child with probability `mutation_probability`, pack the children and
//!    pass them through the configured local search (keeping its most
//!    efficient result).
//! 4. Elitist replacement: the best `population_size` of parents and
//!    children survive. The best survivor of each generation is recorded.
//!
//! Returns the unique recorded bests, most efficient first.

use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::{find_articulation_points, find_regions, region_crossover, region_mutation};
use super::{GaConfig, Region};
use crate::constructive::{pack_sequence, random_sequence};
use crate::evaluation::LineEvaluator;
use crate::graph::PrecedenceGraph;
use crate::local_search::{argmax, improve, LocalSearchMode};
use crate::models::{Sequence, Solution, TaskId};

/// Result of a genetic search run.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Unique best-of-generation solutions, most efficient first, at most
    /// `output_count` of them.
    pub solutions: Vec<Solution>,
    /// Efficiency of the best survivor after each generation.
    pub history: Vec<f64>,
}

/// Genetic search bound to one graph and cycle time.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::ga::{GaConfig, GeneticSearch};
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::local_search::LocalSearchMode;
/// use u_balance::models::Task;
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_generations(5)
///     .with_local_search(LocalSearchMode::None);
///
/// let search = GeneticSearch::new(&graph, 6.0, config);
/// let outcome = search.run(&mut StdRng::seed_from_u64(42));
/// assert_eq!(outcome.solutions.len(), 1);
/// assert_eq!(outcome.history.len(), 5);
/// ```
pub struct GeneticSearch<'g> {
    graph: &'g PrecedenceGraph,
    cycle_time: f64,
    config: GaConfig,
    articulation_points: Vec<TaskId>,
    regions: Vec<Region>,
}

impl<'g> GeneticSearch<'g> {
    /// Prepares a search, computing articulation points and regions.
    pub fn new(graph: &'g PrecedenceGraph, cycle_time: f64, config: GaConfig) -> Self {
        let articulation_points = find_articulation_points(graph);
        let regions = find_regions(graph, &articulation_points);
        Self {
            graph,
            cycle_time,
            config,
            articulation_points,
            regions,
        }
    }

    /// Articulation points in topological order.
    pub fn articulation_points(&self) -> &[TaskId] {
        &self.articulation_points
    }

    /// Recombination regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The search parameters.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Region crossover on a uniformly drawn region.
    ///
    /// Returns copies of the parents when the graph has no region.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &Sequence,
        parent2: &Sequence,
        rng: &mut R,
    ) -> (Sequence, Sequence) {
        if self.regions.is_empty() {
            return (parent1.clone(), parent2.clone());
        }
        let region = &self.regions[rng.random_range(0..self.regions.len())];
        region_crossover(parent1, parent2, region)
    }

    /// Region mutation on a uniformly drawn region.
    pub fn mutate<R: Rng>(&self, sequence: &Sequence, rng: &mut R) -> Sequence {
        if self.regions.is_empty() {
            return sequence.clone();
        }
        let region = &self.regions[rng.random_range(0..self.regions.len())];
        region_mutation(sequence, region, self.graph, rng)
    }

    /// Runs the search.
    pub fn run<R: Rng>(&self, rng: &mut R) -> GaOutcome {
        let config = &self.config;
        let size = config.population_size.max(2);
        let evaluator = LineEvaluator::new(self.graph, self.cycle_time);

        info!(
            tasks = self.graph.len(),
            cycle_time = self.cycle_time,
            population = size,
            generations = config.generations,
            regions = self.regions.len(),
            "running genetic search"
        );

        let mut population: Vec<Solution> = (0..size)
            .map(|_| {
                let sequence = random_sequence(self.graph, rng);
                pack_sequence(&sequence, self.graph, self.cycle_time)
            })
            .collect();
        let mut scores = score_all(&evaluator, &population);

        let mut best = Vec::with_capacity(config.generations);
        let mut history = Vec::with_capacity(config.generations);

        for generation in 0..config.generations {
            let mut children = Vec::with_capacity(size);
            for _ in 0..size / 2 {
                let (a, b) = select_parents(&scores, rng);
                let s1 = population[a].flatten();
                let s2 = population[b].flatten();

                let (mut c1, mut c2) = if rng.random::<f64>() < config.crossover_probability {
                    self.crossover(&s1, &s2, rng)
                } else {
                    (s1, s2)
                };
                if rng.random::<f64>() < config.mutation_probability {
                    c1 = self.mutate(&c1, rng);
                }
                if rng.random::<f64>() < config.mutation_probability {
                    c2 = self.mutate(&c2, rng);
                }

                for child in [c1, c2] {
                    let packed = pack_sequence(&child, self.graph, self.cycle_time);
                    children.push(self.polish(&evaluator, packed, rng));
                }
            }

            let child_scores = score_all(&evaluator, &children);
            let mut pool: Vec<(Solution, f64)> = population
                .into_iter()
                .zip(scores)
                .chain(children.into_iter().zip(child_scores))
                .collect();
            pool.sort_by(|a, b| b.1.total_cmp(&a.1));
            pool.truncate(size);

            best.push(pool[0].0.clone());
            history.push(pool[0].1);
            if (generation + 1) % 10 == 0 {
                debug!(generation = generation + 1, best = pool[0].1, "genetic search progress");
            }
            (population, scores) = pool.into_iter().unzip();
        }

        if best.is_empty() {
            let i = argmax(&scores);
            best.push(population[i].clone());
        }
        let solutions = evaluator.rank(best, config.output_count);
        info!(
            efficiency = ?solutions.first().map(|s| evaluator.efficiency(s)),
            "genetic search complete"
        );
        GaOutcome { solutions, history }
    }

    /// Local search on a packed child, keeping its most efficient result.
    fn polish<R: Rng>(
        &self,
        evaluator: &LineEvaluator<'_, PrecedenceGraph>,
        packed: Solution,
        rng: &mut R,
    ) -> Solution {
        if self.config.local_search == LocalSearchMode::None {
            return packed;
        }
        let candidates = improve(
            &packed,
            self.graph,
            self.cycle_time,
            self.config.local_search,
            &self.config.local_search_config,
            rng,
        );
        let scores: Vec<f64> = candidates.iter().map(|s| evaluator.efficiency(s)).collect();
        let i = argmax(&scores);
        candidates.into_iter().nth(i).unwrap_or(packed)
    }
}

fn score_all(evaluator: &LineEvaluator<'_, PrecedenceGraph>, solutions: &[Solution]) -> Vec<f64> {
    solutions.par_iter().map(|s| evaluator.efficiency(s)).collect()
}

/// Draws three distinct individuals and returns the two most efficient.
fn select_parents<R: Rng>(scores: &[f64], rng: &mut R) -> (usize, usize) {
    let mut warriors = index::sample(rng, scores.len(), scores.len().min(3)).into_vec();
    warriors.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let first = warriors[0];
    let second = warriors.get(1).copied().unwrap_or(first);
    (first, second)
}
