//! Solution evaluator bound to a duration table and a cycle time.

use std::collections::HashSet;

use serde::Serialize;

use super::metrics;
use crate::models::{Solution, TaskTimes};

/// Summary metrics of one solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineMetrics {
    /// Number of stations.
    pub stations: usize,
    /// Total assigned work.
    pub total_work: f64,
    /// Busiest station time.
    pub max_station_time: f64,
    /// Smoothness index.
    pub smoothness_index: f64,
    /// Line efficiency (%).
    pub line_efficiency: f64,
    /// Balance delay (%).
    pub balance_delay: f64,
}

/// Scores and checks solutions against a fixed cycle time.
///
/// # Examples
///
/// ```
/// use u_balance::evaluation::LineEvaluator;
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::{Solution, Task};
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
/// let evaluator = LineEvaluator::new(&graph, 6.0);
///
/// let sol = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
/// assert!(evaluator.is_within_capacity(&sol));
/// let report = evaluator.report(&sol);
/// assert_eq!(report.stations, 3);
/// assert!((report.line_efficiency + report.balance_delay - 100.0).abs() < 1e-10);
/// ```
pub struct LineEvaluator<'a, T: TaskTimes + ?Sized> {
    times: &'a T,
    cycle_time: f64,
}

impl<'a, T: TaskTimes + ?Sized> LineEvaluator<'a, T> {
    /// Creates an evaluator.
    pub fn new(times: &'a T, cycle_time: f64) -> Self {
        Self { times, cycle_time }
    }

    /// The cycle time used for scoring.
    pub fn cycle_time(&self) -> f64 {
        self.cycle_time
    }

    /// Line efficiency (%) of a solution at this cycle time.
    pub fn efficiency(&self, solution: &Solution) -> f64 {
        metrics::line_efficiency(solution, self.times, Some(self.cycle_time))
    }

    /// Returns `true` if no station exceeds the cycle time.
    pub fn is_within_capacity(&self, solution: &Solution) -> bool {
        solution
            .stations()
            .iter()
            .all(|s| s.time(self.times) <= self.cycle_time)
    }

    /// Full metric summary.
    pub fn report(&self, solution: &Solution) -> LineMetrics {
        let station_times = solution.station_times(self.times);
        let line_efficiency = self.efficiency(solution);
        LineMetrics {
            stations: solution.num_stations(),
            total_work: station_times.iter().sum(),
            max_station_time: station_times.iter().copied().fold(0.0, f64::max),
            smoothness_index: metrics::smoothness_index(solution, self.times),
            line_efficiency,
            balance_delay: 100.0 - line_efficiency,
        }
    }

    /// De-duplicates, sorts by efficiency (best first, ties keep input
    /// order) and keeps at most `count` solutions.
    pub fn rank(&self, solutions: Vec<Solution>, count: usize) -> Vec<Solution> {
        let mut seen = HashSet::new();
        let mut scored: Vec<(Solution, f64)> = solutions
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .map(|s| {
                let score = self.efficiency(&s);
                (s, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().take(count).map(|(s, _)| s).collect()
    }
}

/// Ranks solutions by line efficiency at `cycle_time`.
///
/// Shorthand for [`LineEvaluator::rank`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_balance::evaluation::rank_solutions;
/// use u_balance::models::Solution;
///
/// let times = HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)]);
/// let loose = Solution::from_lists(vec![vec![1], vec![3], vec![2], vec![4]]);
/// let tight = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
///
/// let ranked = rank_solutions(vec![loose, tight.clone(), tight.clone()], &times, 6.0, 5);
/// assert_eq!(ranked.len(), 2);
/// assert_eq!(ranked[0], tight);
/// ```
pub fn rank_solutions<T: TaskTimes + ?Sized>(
    solutions: Vec<Solution>,
    times: &T,
    cycle_time: f64,
    count: usize,
) -> Vec<Solution> {
    LineEvaluator::new(times, cycle_time).rank(solutions, count)
}

/// Removes duplicate solutions, keeping first occurrences in order.
pub(crate) fn dedup_solutions(solutions: Vec<Solution>) -> Vec<Solution> {
    let mut seen = HashSet::new();
    solutions
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
