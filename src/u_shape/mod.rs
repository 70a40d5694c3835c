//! U-shaped line balancing.
//!
//! On a U-shaped line the entrance and exit sit side by side, so a station
//! may take a task from the front (all predecessors assigned) or from the
//! back (all successors assigned). Both constructive procedures here work
//! on a [`Frontier`](crate::graph::Frontier) open at both ends.
//!
//! - [`u_priority_rule`] — deterministic ranked selection over both ends
//! - [`u_comsoal`] — random selection over both ends with restarts
//!
//! # Reference
//!
//! Miltenburg, G.J. & Wijngaard, J. (1994). "The U-line line balancing
//! problem", *Management Science* 40(10), 1378-1388.

mod comsoal;
mod rule;

use serde::Serialize;

use crate::graph::Frontier;
use crate::models::{Side, Solution};

pub use comsoal::u_comsoal;
pub use rule::u_priority_rule;

/// A U-line balance: stations plus one side label per task, in
/// assignment order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UShapeSolution {
    /// Station assignment.
    pub solution: Solution,
    /// Side each task was taken from, in assignment order.
    pub sides: Vec<Side>,
}

/// Feasible tasks of both ends with the side they are eligible from.
///
/// Back-feasible tasks come first in back exposure order (tagged
/// [`Side::Both`] when also front-feasible), followed by front-only tasks
/// in front exposure order.
pub(crate) fn two_sided_candidates(frontier: &Frontier<'_>) -> Vec<(usize, Side)> {
    let mut candidates: Vec<(usize, Side)> = frontier
        .back_candidates()
        .into_iter()
        .map(|i| {
            let side = if frontier.is_front_feasible(i) {
                Side::Both
            } else {
                Side::Back
            };
            (i, side)
        })
        .collect();
    candidates.extend(
        frontier
            .front_candidates()
            .into_iter()
            .filter(|&i| !frontier.is_back_feasible(i))
            .map(|i| (i, Side::Front)),
    );
    candidates
}

/// Retires a task from the end it was taken from.
pub(crate) fn retire_on(frontier: &mut Frontier<'_>, idx: usize, side: Side) {
    match side {
        Side::Back => frontier.retire_back(idx),
        Side::Front | Side::Both => frontier.retire_front(idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PrecedenceGraph;
    use crate::models::Task;

    #[test]
    fn test_two_sided_candidates_tags() {
        let g = PrecedenceGraph::build(&[
            Task::root(1, 1.0),
            Task::new(2, 1.0, [1]),
            Task::root(3, 1.0),
        ])
        .expect("valid");
        let f = g.frontier();
        let tagged: Vec<(u32, Side)> = two_sided_candidates(&f)
            .into_iter()
            .map(|(i, s)| (g.id_at(i), s))
            .collect();
        // 2 is a leaf, 3 is isolated, 1 is a root.
        assert_eq!(
            tagged,
            vec![(2, Side::Back), (3, Side::Both), (1, Side::Front)]
        );
    }
}
