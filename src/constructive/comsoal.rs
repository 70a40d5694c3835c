//! COMSOAL: random feasible sequencing with restarts.
//!
//! # Algorithm
//!
//! Each restart draws a topological sequence by picking uniformly among
//! the currently feasible tasks, packs it greedily into stations, and
//! optionally passes the result through local search. Restarts share only
//! the read-only graph and run in parallel; each owns a generator seeded
//! from the caller's generator, so results do not depend on thread count.
//!
//! # Reference
//!
//! Arcus, A.L. (1966). "COMSOAL: A computer method of sequencing
//! operations for assembly lines", *International Journal of Production
//! Research* 4(4), 259-277.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::pack_sequence;
use crate::evaluation::dedup_solutions;
use crate::graph::PrecedenceGraph;
use crate::local_search::{improve, LocalSearchConfig, LocalSearchMode};
use crate::models::{Sequence, Solution};

/// COMSOAL parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComsoalConfig {
    /// Independent random restarts.
    pub iterations: usize,
    /// Post-processing applied to each packed sequence.
    pub local_search: LocalSearchMode,
    /// Parameters for the post-processing step.
    pub local_search_config: LocalSearchConfig,
}

impl Default for ComsoalConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            local_search: LocalSearchMode::None,
            local_search_config: LocalSearchConfig::default(),
        }
    }
}

impl ComsoalConfig {
    /// Sets the number of restarts.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the post-processing mode.
    pub fn with_local_search(mut self, mode: LocalSearchMode) -> Self {
        self.local_search = mode;
        self
    }
}

/// Draws one random topological sequence.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::constructive::random_sequence;
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::Task;
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let seq = random_sequence(&graph, &mut rng);
/// assert!(seq.is_topological(&graph));
/// ```
pub fn random_sequence<R: Rng>(graph: &PrecedenceGraph, rng: &mut R) -> Sequence {
    let mut frontier = graph.frontier();
    let mut tasks = Vec::with_capacity(graph.len());

    while !frontier.is_finished() {
        let candidates = frontier.front_candidates();
        debug_assert!(!candidates.is_empty(), "acyclic graph always has a feasible task");
        let chosen = candidates[rng.random_range(0..candidates.len())];
        tasks.push(graph.id_at(chosen));
        frontier.retire_front(chosen);
    }

    Sequence::new(tasks)
}

/// Cycle time used when none is given:
/// `total / max(2, ⌊total / longest task⌋)`, raised to the longest task
/// duration when that is larger. Returns 0 when every task takes zero time.
pub fn estimate_cycle_time(graph: &PrecedenceGraph) -> f64 {
    let total = graph.total_work();
    let longest = graph.max_duration();
    if longest <= 0.0 {
        return total;
    }
    let stations = ((total / longest).floor() as usize).max(2);
    (total / stations as f64).max(longest)
}

/// Runs COMSOAL and returns the unique solutions in restart order.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::constructive::{comsoal, ComsoalConfig};
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::Task;
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let solutions = comsoal(&graph, 6.0, &ComsoalConfig::default(), &mut rng);
/// assert!(!solutions.is_empty());
/// assert!(solutions.iter().all(|s| s.num_tasks() == 4));
/// ```
pub fn comsoal<R: Rng>(
    graph: &PrecedenceGraph,
    cycle_time: f64,
    config: &ComsoalConfig,
    rng: &mut R,
) -> Vec<Solution> {
    info!(
        tasks = graph.len(),
        cycle_time,
        iterations = config.iterations,
        local_search = ?config.local_search,
        "running COMSOAL"
    );

    let seeds: Vec<u64> = (0..config.iterations).map(|_| rng.random()).collect();
    let batches: Vec<Vec<Solution>> = seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let sequence = random_sequence(graph, &mut rng);
            let packed = pack_sequence(&sequence, graph, cycle_time);
            improve(
                &packed,
                graph,
                cycle_time,
                config.local_search,
                &config.local_search_config,
                &mut rng,
            )
        })
        .collect();

    let unique = dedup_solutions(batches.into_iter().flatten().collect());
    debug!(unique = unique.len(), "COMSOAL restarts complete");
    unique
}
