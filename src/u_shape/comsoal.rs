//! Randomized U-line construction with restarts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::{retire_on, two_sided_candidates, UShapeSolution};
use crate::evaluation::LineEvaluator;
use crate::graph::PrecedenceGraph;
use crate::models::{Side, Solution, Station};

/// Balances a U-shaped line by random two-sided selection.
///
/// Each restart repeatedly picks a uniformly random task among those
/// feasible from either end and appends it to the open station, opening a
/// new station when it does not fit. A task feasible from both ends is
/// labelled [`Side::Both`] and retired from a side chosen by a fair coin.
/// The most efficient restart is returned (earliest on ties); at least one
/// restart always runs.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::Task;
/// use u_balance::u_shape::u_comsoal;
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
///
/// let u = u_comsoal(&graph, 6.0, 50, &mut StdRng::seed_from_u64(42));
/// assert_eq!(u.solution.num_tasks(), 4);
/// assert_eq!(u.sides.len(), 4);
/// ```
pub fn u_comsoal<R: Rng>(
    graph: &PrecedenceGraph,
    cycle_time: f64,
    iterations: usize,
    rng: &mut R,
) -> UShapeSolution {
    info!(
        tasks = graph.len(),
        cycle_time, iterations, "running U-line COMSOAL"
    );

    let seeds: Vec<u64> = (0..iterations.max(1)).map(|_| rng.random()).collect();
    let evaluator = LineEvaluator::new(graph, cycle_time);
    let runs: Vec<(UShapeSolution, f64)> = seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let u = random_u_line(graph, cycle_time, &mut rng);
            let score = evaluator.efficiency(&u.solution);
            (u, score)
        })
        .collect();

    let (u, score) = runs
        .into_iter()
        .reduce(|best, run| if run.1 > best.1 { run } else { best })
        .expect("at least one restart runs");
    debug!(
        efficiency = score,
        stations = u.solution.num_stations(),
        "U-line COMSOAL complete"
    );
    u
}

/// One random two-sided construction.
fn random_u_line<R: Rng>(graph: &PrecedenceGraph, cycle_time: f64, rng: &mut R) -> UShapeSolution {
    let mut frontier = graph.frontier();
    let mut solution = Solution::new();
    let mut sides = Vec::with_capacity(graph.len());
    let mut station = Station::new();
    let mut load = 0.0;

    while !frontier.is_finished() {
        let candidates = two_sided_candidates(&frontier);
        if candidates.is_empty() {
            break;
        }
        let (chosen, side) = candidates[rng.random_range(0..candidates.len())];
        let t = graph.duration_at(chosen);

        if load + t <= cycle_time {
            load += t;
        } else {
            if !station.is_empty() {
                solution.push(std::mem::take(&mut station));
            }
            load = t;
        }
        station.push(graph.id_at(chosen));
        sides.push(side);

        let retire_side = match side {
            Side::Both if rng.random_bool(0.5) => Side::Back,
            other => other,
        };
        retire_on(&mut frontier, chosen, retire_side);
    }

    if !station.is_empty() {
        solution.push(station);
    }
    UShapeSolution { solution, sides }
}
