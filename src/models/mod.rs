//! Domain model types for assembly line balancing.
//!
//! Provides the core abstractions: tasks with durations and predecessor
//! sets, stations as capacity-bounded task groups, solutions as ordered
//! station lists, and sequences as precedence-respecting task orders.

mod sequence;
mod side;
mod station;
mod task;

pub use sequence::Sequence;
pub use side::Side;
pub use station::{Solution, Station};
pub use task::{Task, TaskId, TaskTimes};
