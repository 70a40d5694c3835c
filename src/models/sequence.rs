//! Task sequence: a permutation of all tasks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TaskId;
use crate::graph::PrecedenceGraph;

/// A permutation of task identifiers.
///
/// Sequences built by this crate are topological orders of the precedence
/// graph; [`Sequence::is_topological`] checks that property.
///
/// # Examples
///
/// ```
/// use u_balance::models::Sequence;
///
/// let seq = Sequence::new(vec![1, 3, 2, 4]);
/// assert_eq!(seq.len(), 4);
/// assert_eq!(seq.position(2), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    tasks: Vec<TaskId>,
}

impl Sequence {
    /// Wraps a task order.
    pub fn new(tasks: Vec<TaskId>) -> Self {
        Self { tasks }
    }

    /// The task order.
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Consumes the sequence, returning the task order.
    pub fn into_tasks(self) -> Vec<TaskId> {
        self.tasks
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Position of `task`.
    pub fn position(&self, task: TaskId) -> Option<usize> {
        self.tasks.iter().position(|&t| t == task)
    }

    /// Returns `true` if this is a permutation of the graph's tasks in
    /// which every task appears after all of its predecessors.
    pub fn is_topological(&self, graph: &PrecedenceGraph) -> bool {
        if self.tasks.len() != graph.len() {
            return false;
        }
        let mut pos: HashMap<TaskId, usize> = HashMap::with_capacity(self.tasks.len());
        for (i, &t) in self.tasks.iter().enumerate() {
            if graph.index_of(t).is_none() || pos.insert(t, i).is_some() {
                return false;
            }
        }
        graph
            .edges()
            .all(|(from, to)| pos[&from] < pos[&to])
    }
}

impl From<Vec<TaskId>> for Sequence {
    fn from(tasks: Vec<TaskId>) -> Self {
        Self::new(tasks)
    }
}
