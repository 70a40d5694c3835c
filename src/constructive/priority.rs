//! Priority-rule station filling.
//!
//! # Algorithm
//!
//! Keep one open station. At each step, rank the feasible tasks by the
//! rule's weight (descending, ties in frontier order) and assign the first
//! one that still fits the open station. If none fits, close the station
//! and open a new one with the top-ranked task.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of tasks.
//!
//! # Reference
//!
//! Helgeson, W.B. & Birnie, D.P. (1961). "Assembly line balancing using
//! the ranked positional weight technique", *Journal of Industrial
//! Engineering* 12(6), 394-398.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::PrecedenceGraph;
use crate::models::{Solution, Station};

/// Ranking rule for feasible tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityRule {
    /// Largest Candidate Rule: total downstream work (forward weight).
    #[serde(rename = "lcr")]
    LargestCandidate,
    /// Helgeson-Birnie: number of tasks reachable downstream.
    #[serde(rename = "hb")]
    HelgesonBirnie,
}

impl PriorityRule {
    /// Weight of a task taken from the front of the line.
    pub(crate) fn front_weight(self, graph: &PrecedenceGraph, idx: usize) -> f64 {
        match self {
            PriorityRule::LargestCandidate => graph.forward_weight_at(idx),
            PriorityRule::HelgesonBirnie => graph.descendant_count_at(idx) as f64,
        }
    }

    /// Weight of a task taken from the back of the line.
    pub(crate) fn back_weight(self, graph: &PrecedenceGraph, idx: usize) -> f64 {
        match self {
            PriorityRule::LargestCandidate => graph.backward_weight_at(idx),
            PriorityRule::HelgesonBirnie => graph.ancestor_count_at(idx) as f64,
        }
    }
}

/// Builds a solution with a priority rule.
///
/// `cycle_time` should be validated with
/// [`PrecedenceGraph::validate_cycle_time`] first; a task longer than the
/// cycle time ends up alone in an overloaded station.
///
/// # Examples
///
/// ```
/// use u_balance::constructive::{priority_rule, PriorityRule};
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
/// let sol = priority_rule(&graph, 6.0, PriorityRule::LargestCandidate);
/// assert_eq!(sol.to_lists(), vec![vec![1, 3], vec![2], vec![4]]);
/// ```
pub fn priority_rule(graph: &PrecedenceGraph, cycle_time: f64, rule: PriorityRule) -> Solution {
    let mut frontier = graph.frontier();
    let mut solution = Solution::new();
    let mut station = Station::new();
    let mut load = 0.0;

    while !frontier.is_finished() {
        let mut candidates = frontier.front_candidates();
        rank_descending(&mut candidates, |i| rule.front_weight(graph, i));

        let chosen = match candidates
            .iter()
            .copied()
            .find(|&i| load + graph.duration_at(i) <= cycle_time)
        {
            Some(i) => {
                load += graph.duration_at(i);
                i
            }
            None => {
                let top = *candidates
                    .first()
                    .expect("acyclic graph always has a feasible task");
                if !station.is_empty() {
                    trace!(station = solution.num_stations(), load, "closing station");
                    solution.push(std::mem::take(&mut station));
                }
                load = graph.duration_at(top);
                top
            }
        };

        station.push(graph.id_at(chosen));
        frontier.retire_front(chosen);
    }

    if !station.is_empty() {
        solution.push(station);
    }

    debug!(
        ?rule,
        cycle_time,
        stations = solution.num_stations(),
        "priority rule balance complete"
    );
    solution
}

/// Stable sort of candidate indices by descending weight.
pub(crate) fn rank_descending<F: Fn(usize) -> f64>(candidates: &mut [usize], weight: F) {
    candidates.sort_by(|&a, &b| weight(b).total_cmp(&weight(a)));
}
