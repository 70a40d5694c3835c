//! # u-balance
//!
//! Assembly line balancing library: precedence graphs, constructive
//! heuristics, station-level local search, region-based genetic search,
//! and U-shaped lines.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Task, Station, Solution, Sequence, Side)
//! - [`graph`] — Precedence graph with derived weights and a working frontier
//! - [`evaluation`] — Smoothness index, line efficiency, balance delay
//! - [`constructive`] — Priority rules (LCR, Helgeson-Birnie) and COMSOAL
//! - [`local_search`] — Shift neighbourhood and station-level evolution
//! - [`ga`] — Genetic search with articulation-point regions
//! - [`u_shape`] — Two-sided construction for U-shaped lines
//! - [`config`] / [`balancer`] — Request configuration and dispatch
//! - [`error`] — Validation errors

pub mod balancer;
pub mod config;
pub mod constructive;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod graph;
pub mod local_search;
pub mod models;
pub mod u_shape;

pub use error::{BalanceError, BalanceResult};
