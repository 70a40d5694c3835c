//! Top-level entry point: validate a line and a request, then dispatch.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::config::{Algorithm, BalanceConfig};
use crate::constructive::{comsoal, estimate_cycle_time, priority_rule, PriorityRule};
use crate::error::{BalanceError, BalanceResult};
use crate::evaluation::{LineEvaluator, LineMetrics};
use crate::ga::GeneticSearch;
use crate::graph::PrecedenceGraph;
use crate::models::{Side, Solution, Task};
use crate::u_shape::{u_comsoal, u_priority_rule};

/// Result of a balancing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceOutcome {
    /// Cycle time the line was balanced for (given or derived).
    pub cycle_time: f64,
    /// Solutions, most efficient first.
    pub solutions: Vec<Solution>,
    /// Side labels of the first solution, for U-shaped requests.
    pub sides: Option<Vec<Side>>,
}

impl BalanceOutcome {
    /// The most efficient solution.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}

/// A validated assembly line ready to be balanced.
///
/// # Examples
///
/// ```
/// use u_balance::balancer::LineBalancer;
/// use u_balance::config::{Algorithm, BalanceConfig};
/// use u_balance::models::Task;
///
/// let line = LineBalancer::new(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
///
/// let config = BalanceConfig::default()
///     .with_algorithm(Algorithm::Lcr)
///     .with_cycle_time(6.0);
/// let outcome = line.balance(&config).unwrap();
/// assert_eq!(outcome.best().unwrap().num_stations(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct LineBalancer {
    graph: PrecedenceGraph,
}

impl LineBalancer {
    /// Builds the precedence graph of `tasks`.
    ///
    /// # Errors
    ///
    /// Any graph construction error: empty input, duplicate or reserved
    /// identifiers, invalid durations, unknown predecessors, or a cycle.
    pub fn new(tasks: &[Task]) -> BalanceResult<Self> {
        Ok(Self {
            graph: PrecedenceGraph::build(tasks)?,
        })
    }

    /// The line's precedence graph.
    pub fn graph(&self) -> &PrecedenceGraph {
        &self.graph
    }

    /// Metric summary of `solution` at `cycle_time`.
    pub fn report(&self, solution: &Solution, cycle_time: f64) -> LineMetrics {
        LineEvaluator::new(&self.graph, cycle_time).report(solution)
    }

    /// Runs the configured procedure.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`BalanceConfig::validate`], and
    /// [`BalanceError::InfeasibleCycleTime`] when a task exceeds the cycle
    /// time. A COMSOAL request without a cycle time on a line whose tasks
    /// all take zero time derives a cycle time of 0 and fails with
    /// [`BalanceError::InvalidCycleTime`].
    pub fn balance(&self, config: &BalanceConfig) -> BalanceResult<BalanceOutcome> {
        config.validate()?;
        let graph = &self.graph;

        let cycle_time = match config.cycle_time {
            Some(ct) => ct,
            None if config.algorithm == Algorithm::Comsoal => estimate_cycle_time(graph),
            None => {
                return Err(BalanceError::InvalidConfig(format!(
                    "cycle_time is required for {}",
                    config.algorithm
                )))
            }
        };
        graph.validate_cycle_time(cycle_time)?;

        info!(
            algorithm = %config.algorithm,
            u_shape = config.u_shape,
            tasks = graph.len(),
            cycle_time,
            seed = config.seed,
            "balancing line"
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let evaluator = LineEvaluator::new(graph, cycle_time);

        let (solutions, sides) = if config.u_shape {
            let u = match config.algorithm {
                Algorithm::Lcr => u_priority_rule(graph, cycle_time, PriorityRule::LargestCandidate),
                Algorithm::Hb => u_priority_rule(graph, cycle_time, PriorityRule::HelgesonBirnie),
                Algorithm::Comsoal => u_comsoal(graph, cycle_time, config.iterations, &mut rng),
                Algorithm::Genetic => {
                    return Err(BalanceError::InvalidConfig(
                        "U-shaped balancing supports lcr, hb and comsoal".into(),
                    ))
                }
            };
            (vec![u.solution], Some(u.sides))
        } else {
            let solutions = match config.algorithm {
                Algorithm::Lcr => vec![priority_rule(graph, cycle_time, PriorityRule::LargestCandidate)],
                Algorithm::Hb => vec![priority_rule(graph, cycle_time, PriorityRule::HelgesonBirnie)],
                Algorithm::Comsoal => {
                    let pool = comsoal(graph, cycle_time, &config.comsoal_config(), &mut rng);
                    evaluator.rank(pool, config.output_count)
                }
                Algorithm::Genetic => {
                    GeneticSearch::new(graph, cycle_time, config.ga_config())
                        .run(&mut rng)
                        .solutions
                }
            };
            (solutions, None)
        };

        if let Some(best) = solutions.first() {
            info!(
                stations = best.num_stations(),
                efficiency = evaluator.efficiency(best),
                returned = solutions.len(),
                "line balanced"
            );
        }

        Ok(BalanceOutcome {
            cycle_time,
            solutions,
            sides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::LocalSearchMode;

    fn diamond() -> Vec<Task> {
        vec![
            Task::root(1, 2.0),
            Task::new(2, 5.0, [1]),
            Task::new(3, 4.0, [1]),
            Task::new(4, 3.0, [2, 3]),
        ]
    }

    fn line() -> LineBalancer {
        LineBalancer::new(&diamond()).expect("valid")
    }

    #[test]
    fn test_lcr_scenario() {
        let config = BalanceConfig::default().with_cycle_time(6.0);
        let outcome = line().balance(&config).expect("balanced");
        let best = outcome.best().expect("one solution");
        assert_eq!(best.to_lists(), vec![vec![1, 3], vec![2], vec![4]]);
        assert!(outcome.sides.is_none());

        let m = line().report(best, 6.0);
        assert!((m.total_work - 14.0).abs() < 1e-10);
        assert!((m.smoothness_index - 10f64.sqrt()).abs() < 1e-10);
        assert!((m.line_efficiency - 82.4318).abs() < 1e-3);
    }

    #[test]
    fn test_infeasible_cycle_time() {
        let config = BalanceConfig::default().with_cycle_time(4.0);
        assert_eq!(
            line().balance(&config),
            Err(BalanceError::InfeasibleCycleTime {
                task: 2,
                duration: 5.0,
                cycle_time: 4.0,
            })
        );
    }

    #[test]
    fn test_comsoal_auto_cycle_time() {
        let config = BalanceConfig::default()
            .with_algorithm(Algorithm::Comsoal)
            .with_iterations(20)
            .with_output_count(3);
        let line = line();
        let outcome = line.balance(&config).expect("balanced");
        // total 14, longest 5: 14 / max(2, floor(14 / 5)) = 7
        assert!((outcome.cycle_time - 7.0).abs() < 1e-10);
        assert!(!outcome.solutions.is_empty());
        assert!(outcome.solutions.len() <= 3);
        let evaluator = LineEvaluator::new(line.graph(), 7.0);
        for pair in outcome.solutions.windows(2) {
            assert!(evaluator.efficiency(&pair[0]) >= evaluator.efficiency(&pair[1]));
        }
    }

    #[test]
    fn test_genetic_is_seeded() {
        let config = BalanceConfig::default()
            .with_algorithm(Algorithm::Genetic)
            .with_cycle_time(6.0)
            .with_population_size(8)
            .with_generations(4)
            .with_local_search(LocalSearchMode::Local);
        let a = line().balance(&config).expect("balanced");
        let b = line().balance(&config).expect("balanced");
        assert_eq!(a, b);
        assert!(a.solutions[0].is_precedence_feasible(line().graph()));
    }

    #[test]
    fn test_u_shape_dispatch() {
        let config = BalanceConfig::default()
            .with_cycle_time(6.0)
            .with_u_shape(true);
        let outcome = line().balance(&config).expect("balanced");
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.sides.as_ref().map(Vec::len), Some(4));

        let config = config.with_algorithm(Algorithm::Genetic);
        assert!(matches!(
            line().balance(&config),
            Err(BalanceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_comsoal_zero_work_needs_cycle_time() {
        let line = LineBalancer::new(&[Task::root(1, 0.0), Task::new(2, 0.0, [1])])
            .expect("valid");
        let config = BalanceConfig::default().with_algorithm(Algorithm::Comsoal);
        assert_eq!(
            line.balance(&config),
            Err(BalanceError::InvalidCycleTime(0.0))
        );
        assert!(line.balance(&config.with_cycle_time(1.0)).is_ok());
    }

    #[test]
    fn test_construction_errors_surface() {
        let tasks = vec![Task::root(1, 1.0), Task::new(2, 1.0, [3])];
        assert!(matches!(
            LineBalancer::new(&tasks),
            Err(BalanceError::UnknownPredecessor { task: 2, predecessor: 3 })
        ));
        assert_eq!(LineBalancer::new(&[]).err(), Some(BalanceError::EmptyInput));
    }
}
