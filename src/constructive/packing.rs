//! Greedy sequence packing.

use crate::models::{Sequence, Solution, Station, TaskTimes};

/// Folds a task sequence into stations left to right.
///
/// Tasks are appended to the open station while it stays within
/// `cycle_time`; the next task that would overflow opens a new station.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_balance::constructive::pack_sequence;
/// use u_balance::models::Sequence;
///
/// let times = HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)]);
/// let sol = pack_sequence(&Sequence::new(vec![1, 3, 2, 4]), &times, 6.0);
/// assert_eq!(sol.to_lists(), vec![vec![1, 3], vec![2], vec![4]]);
/// ```
pub fn pack_sequence<T: TaskTimes + ?Sized>(
    sequence: &Sequence,
    times: &T,
    cycle_time: f64,
) -> Solution {
    let mut solution = Solution::new();
    let mut station = Station::new();
    let mut load = 0.0;

    for &task in sequence.tasks() {
        let t = times.time_of(task);
        if load + t > cycle_time && !station.is_empty() {
            solution.push(std::mem::take(&mut station));
            load = 0.0;
        }
        station.push(task);
        load += t;
    }

    if !station.is_empty() {
        solution.push(station);
    }
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use std::collections::HashMap;

    fn times() -> HashMap<TaskId, f64> {
        HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)])
    }

    #[test]
    fn test_pack_order_matters() {
        let t = times();
        let sol = pack_sequence(&Sequence::new(vec![1, 2, 3, 4]), &t, 6.0);
        assert_eq!(sol.to_lists(), vec![vec![1], vec![2], vec![3], vec![4]]);
    }

    #[test]
    fn test_pack_exact_fit() {
        let t = times();
        let sol = pack_sequence(&Sequence::new(vec![1, 3, 2, 4]), &t, 14.0);
        assert_eq!(sol.num_stations(), 1);
    }

    #[test]
    fn test_pack_empty() {
        let sol = pack_sequence(&Sequence::default(), &times(), 6.0);
        assert_eq!(sol.num_stations(), 0);
    }

    #[test]
    fn test_pack_oversized_task_gets_own_station() {
        let t = times();
        let sol = pack_sequence(&Sequence::new(vec![1, 2, 4]), &t, 4.0);
        assert_eq!(sol.to_lists(), vec![vec![1], vec![2], vec![4]]);
    }
}
