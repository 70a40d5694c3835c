//! Balance metrics.
//!
//! All metrics are pure functions of a station assignment and a duration
//! lookup. The smoothness index squares the raw idle time of each station
//! against the busiest station:
//!
//! ```text
//! SI = sqrt( Σ (max_station_time − station_time(s))² )
//! LE = 100 × (1 − SI / (num_stations × cycle_time))
//! BD = 100 − LE
//! ```
//!
//! When no cycle time is given (`None` or a non-positive value), the
//! largest station time stands in for it. Results are not clamped.

use crate::models::{Solution, TaskId, TaskTimes};

/// Sum of the durations of the given tasks.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_balance::evaluation::station_time;
///
/// let times = HashMap::from([(1, 2.0), (3, 4.0)]);
/// assert_eq!(station_time(&[1, 3], &times), 6.0);
/// ```
pub fn station_time<T: TaskTimes + ?Sized>(tasks: &[TaskId], times: &T) -> f64 {
    tasks.iter().map(|&t| times.time_of(t)).sum()
}

/// Total work assigned across all stations.
pub fn total_work_time<T: TaskTimes + ?Sized>(solution: &Solution, times: &T) -> f64 {
    solution.stations().iter().map(|s| s.time(times)).sum()
}

/// Smoothness index of a solution (lower is better balanced).
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_balance::evaluation::smoothness_index;
/// use u_balance::models::Solution;
///
/// let times = HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)]);
/// let sol = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
/// assert!((smoothness_index(&sol, &times) - 10f64.sqrt()).abs() < 1e-10);
/// ```
pub fn smoothness_index<T: TaskTimes + ?Sized>(solution: &Solution, times: &T) -> f64 {
    let station_times = solution.station_times(times);
    let max = max_time(&station_times);
    station_times
        .iter()
        .map(|&st| (max - st).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Line efficiency in percent.
///
/// An empty solution scores 0; a line whose reference time is zero
/// (only zero-duration tasks) scores 100.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_balance::evaluation::line_efficiency;
/// use u_balance::models::Solution;
///
/// let times = HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)]);
/// let sol = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
/// let le = line_efficiency(&sol, &times, Some(6.0));
/// assert!((le - 82.4316).abs() < 1e-3);
/// ```
pub fn line_efficiency<T: TaskTimes + ?Sized>(
    solution: &Solution,
    times: &T,
    cycle_time: Option<f64>,
) -> f64 {
    let n = solution.num_stations();
    if n == 0 {
        return 0.0;
    }
    let station_times = solution.station_times(times);
    let reference = match cycle_time {
        Some(ct) if ct > 0.0 => ct,
        _ => max_time(&station_times),
    };
    if reference <= 0.0 {
        return 100.0;
    }
    let si = smoothness_index(solution, times);
    100.0 * (1.0 - si / (n as f64 * reference))
}

/// Balance delay in percent: `100 − line_efficiency`.
pub fn balance_delay<T: TaskTimes + ?Sized>(
    solution: &Solution,
    times: &T,
    cycle_time: Option<f64>,
) -> f64 {
    100.0 - line_efficiency(solution, times, cycle_time)
}

/// Lower bound on the number of stations: `⌈total_work / cycle_time⌉`.
///
/// Returns 0 for a non-positive cycle time.
pub fn theoretical_min_stations(total_work: f64, cycle_time: f64) -> usize {
    if cycle_time <= 0.0 {
        return 0;
    }
    // Guard against 14.000000000000002 / 7 style rounding noise.
    let raw = total_work / cycle_time;
    let rounded = raw.round();
    if (raw - rounded).abs() < 1e-9 {
        rounded as usize
    } else {
        raw.ceil() as usize
    }
}

fn max_time(station_times: &[f64]) -> f64 {
    station_times.iter().copied().fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn times() -> HashMap<TaskId, f64> {
        HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)])
    }

    fn reference_solution() -> Solution {
        Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]])
    }

    #[test]
    fn test_reference_metrics() {
        let sol = reference_solution();
        let t = times();
        let si = smoothness_index(&sol, &t);
        assert!((si - 3.1623).abs() < 1e-4);

        let le = line_efficiency(&sol, &t, Some(6.0));
        assert!((le - 82.43).abs() < 1e-2);
        assert!((le - 100.0 * (1.0 - 10f64.sqrt() / 18.0)).abs() < 1e-10);

        let bd = balance_delay(&sol, &t, Some(6.0));
        assert!((bd - 17.57).abs() < 1e-2);
        assert!((le + bd - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_cycle_time_uses_max_station() {
        let sol = reference_solution();
        let t = times();
        let auto = line_efficiency(&sol, &t, None);
        let zero = line_efficiency(&sol, &t, Some(0.0));
        let explicit = line_efficiency(&sol, &t, Some(6.0));
        assert!((auto - explicit).abs() < 1e-10);
        assert!((zero - explicit).abs() < 1e-10);
    }

    #[test]
    fn test_smoothness_ignores_cycle_time_slack() {
        // Idle time is measured against the busiest station, not the cycle.
        let sol = Solution::from_lists(vec![vec![2], vec![1, 4]]);
        let t = times();
        assert!(smoothness_index(&sol, &t).abs() < 1e-10);
        let le = line_efficiency(&sol, &t, Some(10.0));
        assert!((le - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_perfect_balance() {
        let t = HashMap::from([(1, 3.0), (2, 3.0)]);
        let sol = Solution::from_lists(vec![vec![1], vec![2]]);
        assert!((line_efficiency(&sol, &t, Some(3.0)) - 100.0).abs() < 1e-10);
        assert!(balance_delay(&sol, &t, Some(3.0)).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_inputs() {
        let t = times();
        assert_eq!(line_efficiency(&Solution::new(), &t, Some(6.0)), 0.0);
        let zero = HashMap::from([(1, 0.0)]);
        let sol = Solution::from_lists(vec![vec![1]]);
        assert_eq!(line_efficiency(&sol, &zero, None), 100.0);
    }

    #[test]
    fn test_station_and_total_time() {
        let t = times();
        assert_eq!(station_time(&[1, 2], &t), 7.0);
        assert_eq!(station_time(&[], &t), 0.0);
        assert_eq!(total_work_time(&reference_solution(), &t), 14.0);
    }

    #[test]
    fn test_theoretical_min_stations() {
        assert_eq!(theoretical_min_stations(14.0, 6.0), 3);
        assert_eq!(theoretical_min_stations(12.0, 6.0), 2);
        assert_eq!(theoretical_min_stations(0.1 * 3.0, 0.1), 3);
        assert_eq!(theoretical_min_stations(5.0, 0.0), 0);
    }
}
