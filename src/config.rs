//! Balancing request configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constructive::ComsoalConfig;
use crate::error::{BalanceError, BalanceResult};
use crate::ga::GaConfig;
use crate::local_search::{LocalSearchConfig, LocalSearchMode};

/// Balancing procedure selected by a [`BalanceConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Largest Candidate Rule.
    #[default]
    Lcr,
    /// Helgeson-Birnie ranked positional weight.
    Hb,
    /// COMSOAL random sequencing with restarts.
    Comsoal,
    /// Region-based genetic search.
    Genetic,
}

impl Algorithm {
    /// Short lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Lcr => "lcr",
            Algorithm::Hb => "hb",
            Algorithm::Comsoal => "comsoal",
            Algorithm::Genetic => "genetic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to run one balancing request.
///
/// Fields missing from a deserialized document take their defaults.
///
/// # Examples
///
/// ```
/// use u_balance::config::{Algorithm, BalanceConfig};
///
/// let config = BalanceConfig::default()
///     .with_algorithm(Algorithm::Comsoal)
///     .with_iterations(200)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.cycle_time, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Target cycle time. Only COMSOAL derives one when absent.
    pub cycle_time: Option<f64>,
    /// Procedure to run.
    pub algorithm: Algorithm,
    /// COMSOAL restarts (also used by the U-line COMSOAL variant).
    pub iterations: usize,
    /// Genetic search population size.
    pub population_size: usize,
    /// Genetic search generations.
    pub generations: usize,
    /// Genetic crossover probability.
    pub crossover_probability: f64,
    /// Genetic mutation probability.
    pub mutation_probability: f64,
    /// Post-processing for COMSOAL restarts and genetic children.
    pub local_search: LocalSearchMode,
    /// Parameters of the post-processing step.
    pub local_search_config: LocalSearchConfig,
    /// Maximum number of solutions returned.
    pub output_count: usize,
    /// Seed of the request's random generator.
    pub seed: u64,
    /// Balance a U-shaped line instead of a straight one.
    pub u_shape: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            cycle_time: None,
            algorithm: Algorithm::Lcr,
            iterations: 100,
            population_size: 30,
            generations: 50,
            crossover_probability: 0.5,
            mutation_probability: 0.7,
            local_search: LocalSearchMode::None,
            local_search_config: LocalSearchConfig::default(),
            output_count: 1,
            seed: 42,
            u_shape: false,
        }
    }
}

impl BalanceConfig {
    /// Sets the cycle time.
    pub fn with_cycle_time(mut self, cycle_time: f64) -> Self {
        self.cycle_time = Some(cycle_time);
        self
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the number of COMSOAL restarts.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the genetic population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of genetic generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the genetic crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the genetic mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the post-processing mode.
    pub fn with_local_search(mut self, mode: LocalSearchMode) -> Self {
        self.local_search = mode;
        self
    }

    /// Sets the post-processing parameters.
    pub fn with_local_search_config(mut self, config: LocalSearchConfig) -> Self {
        self.local_search_config = config;
        self
    }

    /// Sets the number of solutions returned.
    pub fn with_output_count(mut self, count: usize) -> Self {
        self.output_count = count;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects a U-shaped line.
    pub fn with_u_shape(mut self, u_shape: bool) -> Self {
        self.u_shape = u_shape;
        self
    }

    /// Genetic search parameters carried by this request.
    pub fn ga_config(&self) -> GaConfig {
        GaConfig {
            population_size: self.population_size,
            generations: self.generations,
            crossover_probability: self.crossover_probability,
            mutation_probability: self.mutation_probability,
            local_search: self.local_search,
            local_search_config: self.local_search_config.clone(),
            output_count: self.output_count,
        }
    }

    /// COMSOAL parameters carried by this request.
    pub fn comsoal_config(&self) -> ComsoalConfig {
        ComsoalConfig {
            iterations: self.iterations,
            local_search: self.local_search,
            local_search_config: self.local_search_config.clone(),
        }
    }

    /// Checks the request independently of any line.
    ///
    /// # Errors
    ///
    /// [`BalanceError::InvalidCycleTime`] for a non-positive cycle time,
    /// [`BalanceError::InvalidConfig`] for out-of-range parameters or an
    /// unsupported combination.
    pub fn validate(&self) -> BalanceResult<()> {
        if let Some(ct) = self.cycle_time {
            if !ct.is_finite() || ct <= 0.0 {
                return Err(BalanceError::InvalidCycleTime(ct));
            }
        } else if self.algorithm != Algorithm::Comsoal {
            return Err(BalanceError::InvalidConfig(format!(
                "cycle_time is required for {}",
                self.algorithm
            )));
        }

        if self.output_count == 0 {
            return Err(BalanceError::InvalidConfig(
                "output_count must be at least 1".into(),
            ));
        }

        match self.algorithm {
            Algorithm::Lcr | Algorithm::Hb => Ok(()),
            Algorithm::Comsoal => {
                if self.iterations == 0 {
                    return Err(BalanceError::InvalidConfig(
                        "iterations must be at least 1".into(),
                    ));
                }
                if !(0.0..=1.0).contains(&self.local_search_config.mutation_probability) {
                    return Err(BalanceError::InvalidConfig(format!(
                        "local_search_config.mutation_probability must be within [0, 1], got {}",
                        self.local_search_config.mutation_probability
                    )));
                }
                Ok(())
            }
            Algorithm::Genetic if self.u_shape => Err(BalanceError::InvalidConfig(
                "U-shaped balancing supports lcr, hb and comsoal".into(),
            )),
            Algorithm::Genetic => self.ga_config().validate(),
        }
    }
}
