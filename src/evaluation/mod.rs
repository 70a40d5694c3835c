//! Line metrics and solution evaluation.
//!
//! - [`metrics`] — station time, smoothness index, line efficiency, balance delay
//! - [`LineEvaluator`] — metrics bound to a duration table and cycle time

mod evaluator;
pub mod metrics;

pub(crate) use evaluator::dedup_solutions;
pub use evaluator::{rank_solutions, LineEvaluator, LineMetrics};
pub use metrics::{
    balance_delay, line_efficiency, smoothness_index, station_time, theoretical_min_stations,
    total_work_time,
};
