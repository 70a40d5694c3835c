//! Shift move with downstream capacity repair.
//!
//! # Algorithm
//!
//! Pick a station `k` uniformly at random. If it holds more than one task,
//! move its last task to the front of station `k + 1` (opening it if
//! needed). Then, from `k` onward, push the last task of any overloaded
//! station to the front of the next one until every station fits.
//!
//! The concatenated task order never changes, only station boundaries.

use rand::Rng;

use crate::models::{Solution, Station, TaskTimes};

/// Generates one shift neighbour of `solution`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::local_search::shift_neighbor;
/// use u_balance::models::Solution;
///
/// let times = HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)]);
/// let sol = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let neighbor = shift_neighbor(&sol, &times, 6.0, &mut rng);
/// assert_eq!(neighbor.flatten(), sol.flatten());
/// ```
pub fn shift_neighbor<R: Rng, T: TaskTimes + ?Sized>(
    solution: &Solution,
    times: &T,
    cycle_time: f64,
    rng: &mut R,
) -> Solution {
    let mut stations = solution.stations().to_vec();
    if stations.is_empty() {
        return solution.clone();
    }

    let k = rng.random_range(0..stations.len());
    if stations[k].len() > 1 {
        shift_last(&mut stations, k);
    }
    repair_capacity(&mut stations, k, times, cycle_time);

    Solution::from_stations(stations)
}

/// Pushes overflow forward from station `from` until every station from
/// there on is within `cycle_time`.
///
/// A station left with a single task is never emptied, even if that task
/// alone exceeds the cycle time.
pub fn repair_capacity<T: TaskTimes + ?Sized>(
    stations: &mut Vec<Station>,
    from: usize,
    times: &T,
    cycle_time: f64,
) {
    let mut i = from;
    while i < stations.len() {
        while stations[i].len() > 1 && stations[i].time(times) > cycle_time {
            shift_last(stations, i);
        }
        i += 1;
    }
}

/// Moves the last task of station `k` to the front of station `k + 1`.
fn shift_last(stations: &mut Vec<Station>, k: usize) {
    if k + 1 == stations.len() {
        stations.push(Station::new());
    }
    if let Some(task) = stations[k].pop() {
        stations[k + 1].push_front(task);
    }
}
