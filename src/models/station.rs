//! Station and solution types.

use serde::{Deserialize, Serialize};

use super::{Sequence, TaskId, TaskTimes};
use crate::graph::PrecedenceGraph;

/// A group of tasks performed at one workstation, in assignment order.
///
/// # Examples
///
/// ```
/// use u_balance::models::Station;
///
/// let mut s = Station::new();
/// s.push(1);
/// s.push(3);
/// assert_eq!(s.tasks(), &[1, 3]);
/// assert_eq!(s.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Station {
    tasks: Vec<TaskId>,
}

impl Station {
    /// Creates an empty station.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a station holding the given tasks.
    pub fn from_tasks(tasks: Vec<TaskId>) -> Self {
        Self { tasks }
    }

    /// Appends a task.
    pub fn push(&mut self, task: TaskId) {
        self.tasks.push(task);
    }

    /// Inserts a task at the front.
    pub fn push_front(&mut self, task: TaskId) {
        self.tasks.insert(0, task);
    }

    /// Removes and returns the last task.
    pub fn pop(&mut self) -> Option<TaskId> {
        self.tasks.pop()
    }

    /// Tasks in assignment order.
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the station holds no task.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns `true` if `task` is assigned here.
    pub fn contains(&self, task: TaskId) -> bool {
        self.tasks.contains(&task)
    }

    /// Sum of task durations.
    pub fn time<T: TaskTimes + ?Sized>(&self, times: &T) -> f64 {
        self.tasks.iter().map(|&t| times.time_of(t)).sum()
    }
}

/// An ordered list of stations covering every task of the line.
///
/// Two solutions are equal when they have the same stations holding the
/// same tasks in the same order.
///
/// # Examples
///
/// ```
/// use u_balance::models::Solution;
///
/// let sol = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
/// assert_eq!(sol.num_stations(), 3);
/// assert_eq!(sol.num_tasks(), 4);
/// assert_eq!(sol.station_of(2), Some(1));
/// assert_eq!(sol.flatten().tasks(), &[1, 3, 2, 4]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    stations: Vec<Station>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solution from stations.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Creates a solution from plain task lists.
    pub fn from_lists(lists: Vec<Vec<TaskId>>) -> Self {
        Self {
            stations: lists.into_iter().map(Station::from_tasks).collect(),
        }
    }

    /// Appends a station.
    pub fn push(&mut self, station: Station) {
        self.stations.push(station);
    }

    /// Stations in line order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Number of stations.
    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }

    /// Total number of assigned tasks.
    pub fn num_tasks(&self) -> usize {
        self.stations.iter().map(Station::len).sum()
    }

    /// Index of the station holding `task`.
    pub fn station_of(&self, task: TaskId) -> Option<usize> {
        self.stations.iter().position(|s| s.contains(task))
    }

    /// Concatenates the stations into one task order.
    pub fn flatten(&self) -> Sequence {
        Sequence::new(
            self.stations
                .iter()
                .flat_map(|s| s.tasks().iter().copied())
                .collect(),
        )
    }

    /// Returns `true` if every task of `graph` is assigned exactly once and
    /// no task sits in an earlier station than one of its predecessors.
    ///
    /// Tasks sharing a station must also appear in precedence order.
    pub fn is_precedence_feasible(&self, graph: &PrecedenceGraph) -> bool {
        self.flatten().is_topological(graph)
    }

    /// Station times in line order.
    pub fn station_times<T: TaskTimes + ?Sized>(&self, times: &T) -> Vec<f64> {
        self.stations.iter().map(|s| s.time(times)).collect()
    }

    /// Plain task lists, one per station.
    pub fn to_lists(&self) -> Vec<Vec<TaskId>> {
        self.stations.iter().map(|s| s.tasks().to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn times() -> HashMap<TaskId, f64> {
        HashMap::from([(1, 2.0), (2, 5.0), (3, 4.0), (4, 3.0)])
    }

    #[test]
    fn test_station_time() {
        let s = Station::from_tasks(vec![1, 3]);
        assert!((s.time(&times()) - 6.0).abs() < 1e-10);
        assert_eq!(Station::new().time(&times()), 0.0);
    }

    #[test]
    fn test_station_front_and_pop() {
        let mut s = Station::from_tasks(vec![2]);
        s.push_front(1);
        assert_eq!(s.tasks(), &[1, 2]);
        assert_eq!(s.pop(), Some(2));
        assert_eq!(s.tasks(), &[1]);
    }

    #[test]
    fn test_precedence_feasibility() {
        use crate::models::Task;
        let g = PrecedenceGraph::build(&[
            Task::root(1, 2.0),
            Task::new(2, 5.0, [1]),
            Task::new(3, 4.0, [1]),
            Task::new(4, 3.0, [2, 3]),
        ])
        .expect("valid");
        assert!(Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]).is_precedence_feasible(&g));
        assert!(!Solution::from_lists(vec![vec![2, 1], vec![3, 4]]).is_precedence_feasible(&g));
        assert!(!Solution::from_lists(vec![vec![1, 3], vec![2]]).is_precedence_feasible(&g));
    }

    #[test]
    fn test_solution_station_times() {
        let sol = Solution::from_lists(vec![vec![1, 3], vec![2], vec![4]]);
        assert_eq!(sol.station_times(&times()), vec![6.0, 5.0, 3.0]);
        assert_eq!(sol.station_of(9), None);
    }

    #[test]
    fn test_solution_equality_is_ordered() {
        let a = Solution::from_lists(vec![vec![1, 3], vec![2]]);
        let b = Solution::from_lists(vec![vec![3, 1], vec![2]]);
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
        assert_eq!(a.to_lists(), vec![vec![1, 3], vec![2]]);
    }
}
