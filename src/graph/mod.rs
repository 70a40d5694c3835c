//! Precedence graph and the working frontier used by constructive passes.
//!
//! - [`PrecedenceGraph`] — validated task DAG with priority weights
//! - [`Frontier`] — disposable dependency-count view that retires tasks
//!   from either end of the line

mod frontier;
mod precedence;

pub use frontier::Frontier;
pub use precedence::PrecedenceGraph;
