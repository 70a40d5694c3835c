//! Ranked U-line station filling.

use tracing::{debug, trace};

use super::{retire_on, two_sided_candidates, UShapeSolution};
use crate::constructive::{rank_descending, PriorityRule};
use crate::graph::PrecedenceGraph;
use crate::models::{Side, Solution, Station};

/// Balances a U-shaped line with a priority rule.
///
/// Front candidates are ranked by the rule's forward weight, back-only
/// candidates by its backward weight; the merged list is sorted
/// descending (stable). On the first step with more than one candidate
/// the top and bottom entries are swapped, opening the line from the
/// opposite end. The first candidate that fits the open station is
/// assigned; if none fits, the station is closed and the top candidate
/// opens the next one.
///
/// # Examples
///
/// ```
/// use u_balance::constructive::PriorityRule;
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::{Side, Task};
/// use u_balance::u_shape::u_priority_rule;
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
///
/// let u = u_priority_rule(&graph, 6.0, PriorityRule::LargestCandidate);
/// assert_eq!(u.solution.to_lists(), vec![vec![1, 4], vec![2], vec![3]]);
/// assert_eq!(u.sides, vec![Side::Front, Side::Back, Side::Both, Side::Both]);
/// ```
pub fn u_priority_rule(graph: &PrecedenceGraph, cycle_time: f64, rule: PriorityRule) -> UShapeSolution {
    let mut frontier = graph.frontier();
    let mut solution = Solution::new();
    let mut sides = Vec::with_capacity(graph.len());
    let mut station = Station::new();
    let mut load = 0.0;
    let mut first = true;

    while !frontier.is_finished() {
        let mut candidates = two_sided_candidates(&frontier);
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&(i, side)| match side {
                Side::Back => rule.back_weight(graph, i),
                Side::Front | Side::Both => rule.front_weight(graph, i),
            })
            .collect();
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        rank_descending(&mut order, |k| weights[k]);
        candidates = order.into_iter().map(|k| candidates[k]).collect();

        if first && candidates.len() > 1 {
            let last = candidates.len() - 1;
            candidates.swap(0, last);
            first = false;
        }

        let fitting = candidates
            .iter()
            .copied()
            .find(|&(i, _)| load + graph.duration_at(i) <= cycle_time);
        let (chosen, side) = match fitting {
            Some(c) => {
                load += graph.duration_at(c.0);
                c
            }
            None => {
                let top = *candidates
                    .first()
                    .expect("acyclic graph always has a feasible task");
                if !station.is_empty() {
                    trace!(station = solution.num_stations(), load, "closing station");
                    solution.push(std::mem::take(&mut station));
                }
                load = graph.duration_at(top.0);
                top
            }
        };

        station.push(graph.id_at(chosen));
        sides.push(side);
        retire_on(&mut frontier, chosen, side);
    }

    if !station.is_empty() {
        solution.push(station);
    }

    debug!(
        ?rule,
        cycle_time,
        stations = solution.num_stations(),
        "U-line priority rule balance complete"
    );
    UShapeSolution { solution, sides }
}
