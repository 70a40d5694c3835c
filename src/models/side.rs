//! Line side labels for U-shaped balancing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The end of a U-shaped line a task was eligible from when assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Entrance side: all predecessors already assigned.
    #[serde(rename = "F")]
    Front,
    /// Exit side: all successors already assigned.
    #[serde(rename = "B")]
    Back,
    /// Eligible from either end.
    #[serde(rename = "F-B")]
    Both,
}

impl Side {
    /// Short label: `F`, `B`, or `F-B`.
    pub fn label(self) -> &'static str {
        match self {
            Side::Front => "F",
            Side::Back => "B",
            Side::Both => "F-B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
