//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.

use crate::aco::check_unit;
use crate::error::{HiveError, HiveResult};

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_hive::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 50);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_hive::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_crossover_rate(0.7)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of chromosomes in the population. At least 2, since
    /// tournaments compare two distinct members.
    ///
    /// A seeded run takes its population size from the seeds instead.
    pub population_size: usize,

    /// Number of generations to run.
    pub max_generations: usize,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, both parents pass through unchanged.
    pub crossover_rate: f64,

    /// Probability of each mutation operator firing on a member (0.0–1.0).
    ///
    /// Range reversal and swap are drawn independently.
    pub mutation_rate: f64,

    /// Whether to rescore the population in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 50,
            crossover_rate: 0.6,
            mutation_rate: 0.1,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`HiveError::InvalidConfiguration`] naming the offending field.
    pub fn validate(&self) -> HiveResult<()> {
        if self.population_size < 2 {
            return Err(HiveError::invalid(format!(
                "population_size must be at least 2 for tournament selection, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(HiveError::invalid("max_generations must be at least 1"));
        }
        check_unit("crossover_rate", self.crossover_rate)?;
        check_unit("mutation_rate", self.mutation_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_population_size() {
        let config = GaConfig::default().with_population_size(1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("population_size"), "{err}");
    }

    #[test]
    fn test_invalid_generations() {
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
    }

    #[test]
    fn test_rates_clamped_by_builder() {
        let config = GaConfig::default()
            .with_crossover_rate(1.5)
            .with_mutation_rate(-0.5);
        assert_eq!(config.crossover_rate, 1.0);
        assert_eq!(config.mutation_rate, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_raw_out_of_range_rate_rejected() {
        let mut config = GaConfig::default();
        config.mutation_rate = 1.2;
        assert!(config.validate().is_err());
    }
}
