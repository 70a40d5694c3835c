//! Region-based genetic search for line balancing.
//!
//! - [`find_articulation_points`] / [`find_regions`] — split the precedence
//!   graph into closed regions between cut vertices
//! - [`region_crossover`] / [`region_mutation`] — sequence operators that
//!   only rearrange tasks inside one region
//! - [`GeneticSearch`] — elitist generational loop over packed sequences
//!
//! # Reference
//!
//! Sabuncuoglu, I., Erel, E. & Tanyer, M. (2000). "Assembly line balancing
//! using genetic algorithms", *Journal of Intelligent Manufacturing* 11(3),
//! 295-310.

mod config;
mod operators;
mod regions;
mod search;

pub use config::GaConfig;
pub use operators::{region_crossover, region_mutation};
pub use regions::{find_articulation_points, find_regions, Region};
pub use search::{GaOutcome, GeneticSearch};
