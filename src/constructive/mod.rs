//! Constructive heuristics for building line balances.
//!
//! - [`priority_rule`] — deterministic station filling driven by a
//!   [`PriorityRule`] (Largest Candidate Rule or Helgeson-Birnie)
//! - [`random_sequence`] / [`comsoal`] — COMSOAL random topological
//!   sequencing with restarts (Arcus, 1966)
//! - [`pack_sequence`] — greedy left-to-right packing of a sequence into
//!   stations

mod comsoal;
mod packing;
mod priority;

pub use comsoal::{comsoal, estimate_cycle_time, random_sequence, ComsoalConfig};
pub use packing::pack_sequence;
pub use priority::{priority_rule, PriorityRule};

pub(crate) use priority::rank_descending;
