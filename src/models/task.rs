//! Task type and duration lookups.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Task identifier. Identifier 0 is reserved for the virtual source.
pub type TaskId = u32;

/// A unit of work on the line.
///
/// Predecessors are de-duplicated on construction; a predecessor id of 0
/// means "no predecessor" and is dropped.
///
/// # Examples
///
/// ```
/// use u_balance::models::Task;
///
/// let t = Task::new(4, 3.0, [2, 3]);
/// assert_eq!(t.id(), 4);
/// assert_eq!(t.duration(), 3.0);
/// assert_eq!(t.predecessors(), &[2, 3]);
///
/// let root = Task::new(1, 2.0, [0]);
/// assert!(root.predecessors().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    duration: f64,
    #[serde(default)]
    predecessors: Vec<TaskId>,
}

impl Task {
    /// Creates a task.
    pub fn new(id: TaskId, duration: f64, predecessors: impl IntoIterator<Item = TaskId>) -> Self {
        let mut preds: Vec<TaskId> = Vec::new();
        for p in predecessors {
            if p != 0 && !preds.contains(&p) {
                preds.push(p);
            }
        }
        Self {
            id,
            duration,
            predecessors: preds,
        }
    }

    /// Creates a task without predecessors.
    pub fn root(id: TaskId, duration: f64) -> Self {
        Self::new(id, duration, [])
    }

    /// Task identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Processing time.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Identifiers of the tasks that must be done first.
    pub fn predecessors(&self) -> &[TaskId] {
        &self.predecessors
    }
}

/// Duration lookup used by the metric functions.
///
/// Unknown identifiers contribute zero time.
pub trait TaskTimes {
    /// Duration of `task`, or 0 if unknown.
    fn time_of(&self, task: TaskId) -> f64;
}

impl TaskTimes for HashMap<TaskId, f64> {
    fn time_of(&self, task: TaskId) -> f64 {
        self.get(&task).copied().unwrap_or(0.0)
    }
}

impl TaskTimes for BTreeMap<TaskId, f64> {
    fn time_of(&self, task: TaskId) -> f64 {
        self.get(&task).copied().unwrap_or(0.0)
    }
}

impl<T: TaskTimes + ?Sized> TaskTimes for &T {
    fn time_of(&self, task: TaskId) -> f64 {
        (**self).time_of(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_dedups_predecessors() {
        let t = Task::new(5, 1.0, [2, 2, 0, 3, 2]);
        assert_eq!(t.predecessors(), &[2, 3]);
    }

    #[test]
    fn test_root_task() {
        let t = Task::root(1, 2.5);
        assert_eq!(t.id(), 1);
        assert!(t.predecessors().is_empty());
    }

    #[test]
    fn test_task_times_map() {
        let mut times = HashMap::new();
        times.insert(1, 2.0);
        times.insert(2, 5.0);
        assert_eq!(times.time_of(2), 5.0);
        assert_eq!(times.time_of(9), 0.0);
    }

    #[test]
    fn test_task_deserialize_without_predecessors() {
        let t: Task = serde_json::from_str(r#"{"id": 3, "duration": 4.0}"#).expect("valid json");
        assert_eq!(t.id(), 3);
        assert!(t.predecessors().is_empty());
    }
}
