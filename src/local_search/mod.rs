//! Local search over station assignments.
//!
//! - [`shift_neighbor`] — move the last task of a random station forward,
//!   then repair capacity violations downstream
//! - [`local_neighborhood`] — independent neighbours of one solution
//! - [`evolve_stations`] — small evolutionary loop using the shift move as
//!   its only variation step
//!
//! Every move keeps the concatenated task order unchanged, so a solution
//! built from a topological sequence stays precedence-feasible.

mod evolutionary;
mod neighborhood;
mod shift;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Solution, TaskTimes};

pub use evolutionary::{evolve_stations, LocalSearchConfig};
pub(crate) use evolutionary::argmax;
pub use neighborhood::local_neighborhood;
pub use shift::{repair_capacity, shift_neighbor};

/// Post-processing applied to constructed solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalSearchMode {
    /// Keep the constructed solution as is.
    #[default]
    None,
    /// Sample shift neighbours of the solution.
    Local,
    /// Run the station-level evolutionary loop.
    Genetics,
}

/// Applies the selected local search mode to `initial`.
///
/// Returns the unique candidate solutions; with [`LocalSearchMode::None`]
/// that is just `initial`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::local_search::{improve, LocalSearchConfig, LocalSearchMode};
/// use u_balance::models::Solution;
///
/// let times = HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)]);
/// let initial = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let out = improve(&initial, &times, 6.0, LocalSearchMode::Local,
///                   &LocalSearchConfig::default(), &mut rng);
/// assert_eq!(out[0], initial);
/// assert!(out.iter().all(|s| s.num_tasks() == 4));
/// ```
pub fn improve<R: Rng, T: TaskTimes + ?Sized>(
    initial: &Solution,
    times: &T,
    cycle_time: f64,
    mode: LocalSearchMode,
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Vec<Solution> {
    match mode {
        LocalSearchMode::None => vec![initial.clone()],
        LocalSearchMode::Local => {
            local_neighborhood(initial, times, cycle_time, config.population, rng)
        }
        LocalSearchMode::Genetics => evolve_stations(initial, times, cycle_time, config, rng),
    }
}
