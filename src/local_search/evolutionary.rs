//! Station-level evolutionary search.
//!
//! # Algorithm
//!
//! 1. Seed a population with the initial solution and `population − 1`
//!    shift neighbours.
//! 2. Each generation, the initial solution is carried over unchanged and
//!    `population − 1` children are produced: a 3-way tournament picks the
//!    most efficient of three distinct individuals, which is shifted with
//!    probability `mutation_probability` (else copied).
//! 3. The best child of each generation is recorded.
//!
//! Individuals are scored by line efficiency against their own largest
//! station time rather than the cycle time; the cycle time only bounds the
//! shift move.
//!
//! Returns the unique best-of-generation solutions in generation order.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shift_neighbor;
use crate::evaluation::{dedup_solutions, line_efficiency};
use crate::models::{Solution, TaskTimes};

/// Parameters of the station-level local search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Neighbours drawn (local mode) or population size (genetics mode).
    pub population: usize,
    /// Generations of the evolutionary loop.
    pub generations: usize,
    /// Probability that a tournament winner is shifted.
    pub mutation_probability: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            population: 30,
            generations: 15,
            mutation_probability: 0.7,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the population size.
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the shift probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }
}

/// Runs the evolutionary loop starting from `initial`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::local_search::{evolve_stations, LocalSearchConfig};
/// use u_balance::models::Solution;
///
/// let times = HashMap::from([(1, 1.0), (2, 2.0), (3, 3.0), (4, 2.0)]);
/// let initial = Solution::from_lists(vec![vec![1, 2, 3], vec![4]]);
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let best = evolve_stations(&initial, &times, 6.0, &LocalSearchConfig::default(), &mut rng);
/// assert!(!best.is_empty());
/// assert!(best.iter().all(|s| s.flatten() == initial.flatten()));
/// ```
pub fn evolve_stations<R: Rng, T: TaskTimes + ?Sized>(
    initial: &Solution,
    times: &T,
    cycle_time: f64,
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Vec<Solution> {
    let size = config.population.max(1);

    let mut population = vec![initial.clone()];
    for _ in 1..size {
        population.push(shift_neighbor(initial, times, cycle_time, rng));
    }
    let initial_score = fitness(initial, times);

    let mut best = Vec::with_capacity(config.generations);
    for _ in 0..config.generations {
        let scores: Vec<f64> = population.iter().map(|s| fitness(s, times)).collect();

        let mut children = Vec::with_capacity(size);
        let mut child_scores = Vec::with_capacity(size);
        children.push(initial.clone());
        child_scores.push(initial_score);

        for _ in 1..size {
            let winner = &population[tournament(&scores, rng)];
            let child = if rng.random::<f64>() < config.mutation_probability {
                shift_neighbor(winner, times, cycle_time, rng)
            } else {
                winner.clone()
            };
            child_scores.push(fitness(&child, times));
            children.push(child);
        }

        best.push(children[argmax(&child_scores)].clone());
        population = children;
    }

    if best.is_empty() {
        return vec![initial.clone()];
    }
    dedup_solutions(best)
}

/// Efficiency measured against the solution's busiest station.
fn fitness<T: TaskTimes + ?Sized>(solution: &Solution, times: &T) -> f64 {
    line_efficiency(solution, times, None)
}

/// Index of the best of up to three distinct, uniformly drawn individuals.
pub(crate) fn tournament<R: Rng>(scores: &[f64], rng: &mut R) -> usize {
    let warriors = index::sample(rng, scores.len(), scores.len().min(3));
    let mut winner = warriors.index(0);
    for i in warriors.iter().skip(1) {
        if scores[i] > scores[winner] {
            winner = i;
        }
    }
    winner
}

/// First index of the maximum score.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
