//! Task precedence DAG.
//!
//! Tasks are stored densely in input order. The virtual source and sink
//! of the classical formulation are implicit: roots are the successors of
//! the source, leaves the predecessors of the sink.
//!
//! Priority weights are computed once at build time:
//!
//! - forward weight: duration of a task plus all of its descendants
//! - backward weight: duration of a task plus all of its ancestors
//! - descendant / ancestor counts (task included), used by Helgeson-Birnie
//!
//! # Complexity
//!
//! O(n·(n + m)) to build, where m = number of precedence edges.

use std::collections::{HashMap, VecDeque};

use crate::error::{BalanceError, BalanceResult};
use crate::models::{Sequence, Task, TaskId, TaskTimes};

use super::Frontier;

/// Validated precedence graph of a line.
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
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
///
/// assert_eq!(graph.len(), 4);
/// assert_eq!(graph.forward_weight(1), Some(14.0));
/// assert_eq!(graph.backward_weight(4), Some(14.0));
/// assert_eq!(graph.total_work(), 14.0);
/// ```
#[derive(Debug, Clone)]
pub struct PrecedenceGraph {
    ids: Vec<TaskId>,
    index: HashMap<TaskId, usize>,
    durations: Vec<f64>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    topo_order: Vec<usize>,
    forward_weights: Vec<f64>,
    backward_weights: Vec<f64>,
    descendant_counts: Vec<usize>,
    ancestor_counts: Vec<usize>,
}

impl PrecedenceGraph {
    /// Builds and validates the graph.
    ///
    /// # Errors
    ///
    /// - [`BalanceError::EmptyInput`] if `tasks` is empty
    /// - [`BalanceError::InvalidTaskId`] for identifier 0
    /// - [`BalanceError::InvalidDuration`] for negative or non-finite times
    /// - [`BalanceError::DuplicateId`] if two tasks share an identifier
    /// - [`BalanceError::UnknownPredecessor`] for dangling dependencies
    /// - [`BalanceError::Cycle`] if the dependency relation is cyclic
    pub fn build(tasks: &[Task]) -> BalanceResult<Self> {
        if tasks.is_empty() {
            return Err(BalanceError::EmptyInput);
        }

        let n = tasks.len();
        let mut index = HashMap::with_capacity(n);
        for (i, task) in tasks.iter().enumerate() {
            if task.id() == 0 {
                return Err(BalanceError::InvalidTaskId(0));
            }
            if !task.duration().is_finite() || task.duration() < 0.0 {
                return Err(BalanceError::InvalidDuration {
                    task: task.id(),
                    duration: task.duration(),
                });
            }
            if index.insert(task.id(), i).is_some() {
                return Err(BalanceError::DuplicateId(task.id()));
            }
        }

        let mut successors = vec![Vec::new(); n];
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, task) in tasks.iter().enumerate() {
            for &p in task.predecessors() {
                if p == 0 {
                    continue;
                }
                let pi = *index.get(&p).ok_or(BalanceError::UnknownPredecessor {
                    task: task.id(),
                    predecessor: p,
                })?;
                if predecessors[i].contains(&pi) {
                    continue;
                }
                predecessors[i].push(pi);
                successors[pi].push(i);
            }
        }

        let topo_order = topological_order(&predecessors, &successors).map_err(|i| {
            BalanceError::Cycle {
                task: tasks[i].id(),
            }
        })?;

        let durations: Vec<f64> = tasks.iter().map(Task::duration).collect();
        let mut forward_weights = Vec::with_capacity(n);
        let mut descendant_counts = Vec::with_capacity(n);
        let mut backward_weights = Vec::with_capacity(n);
        let mut ancestor_counts = Vec::with_capacity(n);
        for i in 0..n {
            let down = reachable(i, &successors);
            forward_weights.push(down.iter().map(|&j| durations[j]).sum());
            descendant_counts.push(down.len());

            let up = reachable(i, &predecessors);
            backward_weights.push(up.iter().map(|&j| durations[j]).sum());
            ancestor_counts.push(up.len());
        }

        Ok(Self {
            ids: tasks.iter().map(Task::id).collect(),
            index,
            durations,
            successors,
            predecessors,
            topo_order,
            forward_weights,
            backward_weights,
            descendant_counts,
            ancestor_counts,
        })
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false` for a built graph.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Task identifiers in input order.
    pub fn task_ids(&self) -> &[TaskId] {
        &self.ids
    }

    /// Returns `true` if the task is part of the line.
    pub fn contains(&self, task: TaskId) -> bool {
        self.index.contains_key(&task)
    }

    /// Duration of a task.
    pub fn duration(&self, task: TaskId) -> Option<f64> {
        self.index_of(task).map(|i| self.durations[i])
    }

    /// Duration of the task plus all of its descendants.
    pub fn forward_weight(&self, task: TaskId) -> Option<f64> {
        self.index_of(task).map(|i| self.forward_weights[i])
    }

    /// Duration of the task plus all of its ancestors.
    pub fn backward_weight(&self, task: TaskId) -> Option<f64> {
        self.index_of(task).map(|i| self.backward_weights[i])
    }

    /// Number of tasks reachable from `task`, itself included.
    pub fn descendant_count(&self, task: TaskId) -> Option<usize> {
        self.index_of(task).map(|i| self.descendant_counts[i])
    }

    /// Number of tasks that reach `task`, itself included.
    pub fn ancestor_count(&self, task: TaskId) -> Option<usize> {
        self.index_of(task).map(|i| self.ancestor_counts[i])
    }

    /// Direct predecessors of a task.
    pub fn predecessors(&self, task: TaskId) -> Vec<TaskId> {
        self.index_of(task)
            .map(|i| self.predecessors[i].iter().map(|&j| self.ids[j]).collect())
            .unwrap_or_default()
    }

    /// Direct successors of a task.
    pub fn successors(&self, task: TaskId) -> Vec<TaskId> {
        self.index_of(task)
            .map(|i| self.successors[i].iter().map(|&j| self.ids[j]).collect())
            .unwrap_or_default()
    }

    /// Tasks without predecessors (successors of the virtual source).
    pub fn roots(&self) -> Vec<TaskId> {
        (0..self.len())
            .filter(|&i| self.predecessors[i].is_empty())
            .map(|i| self.ids[i])
            .collect()
    }

    /// Tasks without successors (predecessors of the virtual sink).
    pub fn leaves(&self) -> Vec<TaskId> {
        (0..self.len())
            .filter(|&i| self.successors[i].is_empty())
            .map(|i| self.ids[i])
            .collect()
    }

    /// All precedence edges `(predecessor, task)`.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, TaskId)> + '_ {
        self.successors.iter().enumerate().flat_map(move |(i, succ)| {
            succ.iter().map(move |&j| (self.ids[i], self.ids[j]))
        })
    }

    /// Sum of all task durations.
    pub fn total_work(&self) -> f64 {
        self.durations.iter().sum()
    }

    /// Longest single task duration.
    pub fn max_duration(&self) -> f64 {
        self.durations.iter().copied().fold(0.0, f64::max)
    }

    /// A topological order of all tasks (Kahn, ties in input order).
    pub fn topological_order(&self) -> Sequence {
        Sequence::new(self.topo_order.iter().map(|&i| self.ids[i]).collect())
    }

    /// Checks that `cycle_time` is usable for this line.
    ///
    /// # Errors
    ///
    /// [`BalanceError::InvalidCycleTime`] if not positive and finite,
    /// [`BalanceError::InfeasibleCycleTime`] if a task is longer than it.
    pub fn validate_cycle_time(&self, cycle_time: f64) -> BalanceResult<()> {
        if !cycle_time.is_finite() || cycle_time <= 0.0 {
            return Err(BalanceError::InvalidCycleTime(cycle_time));
        }
        for (i, &d) in self.durations.iter().enumerate() {
            if d > cycle_time {
                return Err(BalanceError::InfeasibleCycleTime {
                    task: self.ids[i],
                    duration: d,
                    cycle_time,
                });
            }
        }
        Ok(())
    }

    /// Fresh working frontier with no task retired.
    pub fn frontier(&self) -> Frontier<'_> {
        Frontier::new(self)
    }

    /// Dense index of a task.
    pub(crate) fn index_of(&self, task: TaskId) -> Option<usize> {
        self.index.get(&task).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> TaskId {
        self.ids[idx]
    }

    pub(crate) fn duration_at(&self, idx: usize) -> f64 {
        self.durations[idx]
    }

    pub(crate) fn forward_weight_at(&self, idx: usize) -> f64 {
        self.forward_weights[idx]
    }

    pub(crate) fn backward_weight_at(&self, idx: usize) -> f64 {
        self.backward_weights[idx]
    }

    pub(crate) fn descendant_count_at(&self, idx: usize) -> usize {
        self.descendant_counts[idx]
    }

    pub(crate) fn ancestor_count_at(&self, idx: usize) -> usize {
        self.ancestor_counts[idx]
    }

    pub(crate) fn successors_at(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    pub(crate) fn predecessors_at(&self, idx: usize) -> &[usize] {
        &self.predecessors[idx]
    }
}

impl TaskTimes for PrecedenceGraph {
    fn time_of(&self, task: TaskId) -> f64 {
        self.duration(task).unwrap_or(0.0)
    }
}

/// Kahn's algorithm. On failure returns the first index left on a cycle.
fn topological_order(
    predecessors: &[Vec<usize>],
    successors: &[Vec<usize>],
) -> Result<Vec<usize>, usize> {
    let n = predecessors.len();
    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(i) = queue.pop_front() {
        order.push(i);
        for &s in &successors[i] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                queue.push_back(s);
            }
        }
    }

    if order.len() < n {
        let stuck = (0..n).find(|&i| in_degree[i] > 0).unwrap_or(0);
        return Err(stuck);
    }
    Ok(order)
}

/// Nodes reachable from `start` along `adjacency`, `start` included.
fn reachable(start: usize, adjacency: &[Vec<usize>]) -> Vec<usize> {
    let mut seen = vec![false; adjacency.len()];
    let mut stack = vec![start];
    let mut out = Vec::new();
    seen[start] = true;
    while let Some(i) = stack.pop() {
        out.push(i);
        for &j in &adjacency[i] {
            if !seen[j] {
                seen[j] = true;
                stack.push(j);
            }
        }
    }
    out
}
