//! Error types for line construction and balancing.

use thiserror::Error;

use crate::models::TaskId;

/// Errors raised while building a line or validating a balancing request.
///
/// All of these are detected before any search starts; the search
/// procedures themselves are infallible once their inputs are validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BalanceError {
    /// No tasks were supplied.
    #[error("no tasks to balance")]
    EmptyInput,

    /// Two tasks share the same identifier.
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),

    /// Identifier 0 is reserved for the virtual source.
    #[error("invalid task id {0}: identifiers must be positive")]
    InvalidTaskId(TaskId),

    /// A task duration is negative or not finite.
    #[error("task {task} has invalid duration {duration}")]
    InvalidDuration {
        /// Offending task.
        task: TaskId,
        /// Supplied duration.
        duration: f64,
    },

    /// A task names a predecessor that is not part of the line.
    #[error("task {task} depends on unknown task {predecessor}")]
    UnknownPredecessor {
        /// Task declaring the dependency.
        task: TaskId,
        /// Missing predecessor.
        predecessor: TaskId,
    },

    /// The dependency relation contains a cycle.
    #[error("precedence cycle detected involving task {task}")]
    Cycle {
        /// A task lying on the cycle.
        task: TaskId,
    },

    /// The cycle time is zero, negative, or not finite.
    #[error("invalid cycle time {0}")]
    InvalidCycleTime(f64),

    /// A task is longer than the cycle time and fits in no station.
    #[error("task {task} (duration {duration}) exceeds cycle time {cycle_time}")]
    InfeasibleCycleTime {
        /// Offending task.
        task: TaskId,
        /// Its duration.
        duration: f64,
        /// Requested cycle time.
        cycle_time: f64,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for balancing operations.
pub type BalanceResult<T> = Result<T, BalanceError>;
