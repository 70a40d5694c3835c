//! Genetic search parameters.

use serde::{Deserialize, Serialize};

use crate::error::{BalanceError, BalanceResult};
use crate::local_search::{LocalSearchConfig, LocalSearchMode};

/// Parameters of [`GeneticSearch`](super::GeneticSearch).
///
/// # Examples
///
/// ```
/// use u_balance::ga::GaConfig;
/// use u_balance::local_search::LocalSearchMode;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_generations(10)
///     .with_local_search(LocalSearchMode::None);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals kept after each elitist replacement.
    pub population_size: usize,
    /// Number of generations.
    pub generations: usize,
    /// Probability that a parent pair is recombined.
    pub crossover_probability: f64,
    /// Probability that each child is mutated.
    pub mutation_probability: f64,
    /// Post-processing applied to each packed child.
    pub local_search: LocalSearchMode,
    /// Parameters for the post-processing step.
    pub local_search_config: LocalSearchConfig,
    /// Maximum number of solutions returned.
    pub output_count: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            generations: 50,
            crossover_probability: 0.5,
            mutation_probability: 0.7,
            local_search: LocalSearchMode::Genetics,
            local_search_config: LocalSearchConfig::default(),
            output_count: 1,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the child post-processing mode.
    pub fn with_local_search(mut self, mode: LocalSearchMode) -> Self {
        self.local_search = mode;
        self
    }

    /// Sets the parameters of the child post-processing step.
    pub fn with_local_search_config(mut self, config: LocalSearchConfig) -> Self {
        self.local_search_config = config;
        self
    }

    /// Sets the number of solutions returned.
    pub fn with_output_count(mut self, count: usize) -> Self {
        self.output_count = count;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> BalanceResult<()> {
        if self.population_size < 3 {
            return Err(BalanceError::InvalidConfig(format!(
                "population_size must be at least 3, got {}",
                self.population_size
            )));
        }
        if self.output_count == 0 {
            return Err(BalanceError::InvalidConfig(
                "output_count must be at least 1".into(),
            ));
        }
        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
            (
                "local_search_config.mutation_probability",
                self.local_search_config.mutation_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(BalanceError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.local_search != LocalSearchMode::None && self.local_search_config.population == 0 {
            return Err(BalanceError::InvalidConfig(
                "local_search_config.population must be positive".into(),
            ));
        }
        Ok(())
    }
}
