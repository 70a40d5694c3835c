//! Working frontier over a precedence graph.
//!
//! Replaces the "rewire edges from the virtual source" simulation with
//! open-dependency counters: a task is feasible from the front when all
//! of its predecessors are retired, and from the back when all of its
//! successors are retired. Snapshots are a plain `clone()`.
//!
//! Candidate enumeration order follows exposure order: roots (or leaves)
//! in input order first, then tasks in the order their first neighbour
//! was retired. Ranking rules sort stably on top of this order.

use crate::models::TaskId;

use super::PrecedenceGraph;

/// Mutable dependency frontier for one constructive pass.
///
/// # Examples
///
/// ```
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::Task;
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
/// ]).unwrap();
///
/// let mut frontier = graph.frontier();
/// assert_eq!(frontier.feasible(), vec![1]);
/// assert!(frontier.retire(1));
/// assert_eq!(frontier.feasible(), vec![2, 3]);
/// assert!(!frontier.is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct Frontier<'g> {
    graph: &'g PrecedenceGraph,
    open_preds: Vec<usize>,
    open_succs: Vec<usize>,
    retired: Vec<bool>,
    front: Vec<usize>,
    back: Vec<usize>,
    on_front: Vec<bool>,
    on_back: Vec<bool>,
    remaining: usize,
}

impl<'g> Frontier<'g> {
    /// Creates a frontier with every task pending.
    pub fn new(graph: &'g PrecedenceGraph) -> Self {
        let n = graph.len();
        let open_preds: Vec<usize> = (0..n).map(|i| graph.predecessors_at(i).len()).collect();
        let open_succs: Vec<usize> = (0..n).map(|i| graph.successors_at(i).len()).collect();
        let front: Vec<usize> = (0..n).filter(|&i| open_preds[i] == 0).collect();
        let back: Vec<usize> = (0..n).filter(|&i| open_succs[i] == 0).collect();
        let mut on_front = vec![false; n];
        let mut on_back = vec![false; n];
        for &i in &front {
            on_front[i] = true;
        }
        for &i in &back {
            on_back[i] = true;
        }
        Self {
            graph,
            open_preds,
            open_succs,
            retired: vec![false; n],
            front,
            back,
            on_front,
            on_back,
            remaining: n,
        }
    }

    /// Returns `true` once every task is retired.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Number of tasks not yet retired.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Tasks whose predecessors are all retired, in exposure order.
    pub fn feasible(&self) -> Vec<TaskId> {
        self.front_candidates()
            .into_iter()
            .map(|i| self.graph.id_at(i))
            .collect()
    }

    /// Tasks whose successors are all retired, in exposure order.
    pub fn feasible_back(&self) -> Vec<TaskId> {
        self.back_candidates()
            .into_iter()
            .map(|i| self.graph.id_at(i))
            .collect()
    }

    /// Retires a front-feasible task. Returns `false` if it is not one.
    pub fn retire(&mut self, task: TaskId) -> bool {
        match self.graph.index_of(task) {
            Some(i) if !self.retired[i] && self.open_preds[i] == 0 => {
                self.retire_front(i);
                true
            }
            _ => false,
        }
    }

    /// Retires a back-feasible task. Returns `false` if it is not one.
    pub fn retire_from_back(&mut self, task: TaskId) -> bool {
        match self.graph.index_of(task) {
            Some(i) if !self.retired[i] && self.open_succs[i] == 0 => {
                self.retire_back(i);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn front_candidates(&self) -> Vec<usize> {
        self.front
            .iter()
            .copied()
            .filter(|&i| self.open_preds[i] == 0)
            .collect()
    }

    pub(crate) fn back_candidates(&self) -> Vec<usize> {
        self.back
            .iter()
            .copied()
            .filter(|&i| self.open_succs[i] == 0)
            .collect()
    }

    pub(crate) fn is_front_feasible(&self, idx: usize) -> bool {
        !self.retired[idx] && self.open_preds[idx] == 0
    }

    pub(crate) fn is_back_feasible(&self, idx: usize) -> bool {
        !self.retired[idx] && self.open_succs[idx] == 0
    }

    /// Retires `idx` from the front and exposes its successors.
    pub(crate) fn retire_front(&mut self, idx: usize) {
        debug_assert!(self.is_front_feasible(idx), "task retired out of order");
        self.mark_retired(idx);
        let graph = self.graph;
        for &s in graph.successors_at(idx) {
            if !self.on_front[s] && !self.retired[s] {
                self.on_front[s] = true;
                self.front.push(s);
            }
        }
    }

    /// Retires `idx` from the back and exposes its predecessors.
    pub(crate) fn retire_back(&mut self, idx: usize) {
        debug_assert!(self.is_back_feasible(idx), "task retired out of order");
        self.mark_retired(idx);
        let graph = self.graph;
        for &p in graph.predecessors_at(idx) {
            if !self.on_back[p] && !self.retired[p] {
                self.on_back[p] = true;
                self.back.push(p);
            }
        }
    }

    fn mark_retired(&mut self, idx: usize) {
        self.retired[idx] = true;
        self.remaining -= 1;
        let graph = self.graph;
        for &s in graph.successors_at(idx) {
            self.open_preds[s] -= 1;
        }
        for &p in graph.predecessors_at(idx) {
            self.open_succs[p] -= 1;
        }
        self.front.retain(|&i| i != idx);
        self.back.retain(|&i| i != idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn diamond() -> PrecedenceGraph {
        PrecedenceGraph::build(&[
            Task::new(1, 2.0, []),
            Task::new(2, 5.0, [1]),
            Task::new(3, 4.0, [1]),
            Task::new(4, 3.0, [2, 3]),
        ])
        .expect("valid")
    }

    #[test]
    fn test_front_retirement_order() {
        let g = diamond();
        let mut f = g.frontier();
        assert_eq!(f.feasible(), vec![1]);
        assert!(!f.retire(2));
        assert!(f.retire(1));
        assert_eq!(f.feasible(), vec![2, 3]);
        assert!(f.retire(3));
        assert_eq!(f.feasible(), vec![2]);
        assert!(f.retire(2));
        assert_eq!(f.feasible(), vec![4]);
        assert!(f.retire(4));
        assert!(f.is_finished());
        assert!(f.feasible().is_empty());
    }

    #[test]
    fn test_back_retirement_order() {
        let g = diamond();
        let mut f = g.frontier();
        assert_eq!(f.feasible_back(), vec![4]);
        assert!(f.retire_from_back(4));
        assert_eq!(f.feasible_back(), vec![2, 3]);
        assert!(!f.retire_from_back(1));
        assert!(f.retire_from_back(2));
        assert!(f.retire_from_back(3));
        assert_eq!(f.feasible_back(), vec![1]);
        assert_eq!(f.feasible(), vec![1]);
    }

    #[test]
    fn test_mixed_retirement() {
        let g = diamond();
        let mut f = g.frontier();
        assert!(f.retire_from_back(4));
        assert!(f.retire(1));
        assert_eq!(f.feasible(), vec![2, 3]);
        assert_eq!(f.feasible_back(), vec![2, 3]);
        assert_eq!(f.remaining(), 2);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let g = diamond();
        let mut f = g.frontier();
        f.retire(1);
        let snapshot = f.clone();
        f.retire(2);
        assert_eq!(snapshot.feasible(), vec![2, 3]);
        assert_eq!(f.feasible(), vec![3]);
    }

    #[test]
    fn test_exposure_order_follows_first_retired_neighbour() {
        // 1 -> 3, 2 -> 3, 2 -> 4: retiring 2 exposes 3 and 4 together,
        // so 3 keeps its place ahead of 4 once 1 is retired.
        let g = PrecedenceGraph::build(&[
            Task::root(1, 1.0),
            Task::root(2, 1.0),
            Task::new(3, 1.0, [1, 2]),
            Task::new(4, 1.0, [2]),
        ])
        .expect("valid");
        let mut f = g.frontier();
        f.retire(2);
        assert_eq!(f.feasible(), vec![1, 4]);
        f.retire(1);
        assert_eq!(f.feasible(), vec![3, 4]);
    }
}
