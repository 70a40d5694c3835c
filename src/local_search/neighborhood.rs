//! Sampled shift neighbourhood.

use rand::Rng;

use super::shift_neighbor;
use crate::evaluation::dedup_solutions;
use crate::models::{Solution, TaskTimes};

/// Returns `initial` followed by the unique ones among `population − 1`
/// independently drawn shift neighbours.
pub fn local_neighborhood<R: Rng, T: TaskTimes + ?Sized>(
    initial: &Solution,
    times: &T,
    cycle_time: f64,
    population: usize,
    rng: &mut R,
) -> Vec<Solution> {
    let mut all = Vec::with_capacity(population.max(1));
    all.push(initial.clone());
    for _ in 1..population {
        all.push(shift_neighbor(initial, times, cycle_time, rng));
    }
    dedup_solutions(all)
}
