//! ACO configuration.
//!
//! [`AcoParams`] and [`StopCondition`] are shared by both variants;
//! [`AcsConfig`] and [`EasConfig`] add the variant-specific parameters.

use crate::error::{HiveError, HiveResult};

/// Parameters common to every ant colony variant.
///
/// # Defaults
///
/// ```
/// use u_hive::aco::AcoParams;
///
/// let params = AcoParams::default();
/// assert_eq!(params.num_ants, 20);
/// assert_eq!(params.alpha, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcoParams {
    /// Number of ants constructing a solution each iteration.
    pub num_ants: usize,

    /// Influence of the pheromone component in selection values.
    pub alpha: f64,

    /// Influence of the heuristic component in selection values.
    pub beta: f64,

    /// Evaporation rate in `[0, 1]`.
    ///
    /// ACS uses it as the weight of the global update on best-tour edges;
    /// EAS evaporates every pair by this factor once per iteration.
    pub rho: f64,
}

impl Default for AcoParams {
    fn default() -> Self {
        Self {
            num_ants: 20,
            alpha: 1.0,
            beta: 2.5,
            rho: 0.1,
        }
    }
}

impl AcoParams {
    /// Sets the number of ants.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho.clamp(0.0, 1.0);
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> HiveResult<()> {
        if self.num_ants == 0 {
            return Err(HiveError::invalid("num_ants must be at least 1"));
        }
        check_exponent("alpha", self.alpha)?;
        check_exponent("beta", self.beta)?;
        check_unit("rho", self.rho)
    }
}

/// When a colony run stops.
///
/// A run always stops after `max_iterations`. With a target set through
/// [`with_target`](StopCondition::with_target) it also stops as soon as
/// `best / optimal - 1 <= stop_percent`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StopCondition {
    /// Upper bound on iterations.
    pub max_iterations: usize,

    /// Known optimal score used for early stopping. `None` runs to
    /// `max_iterations`.
    pub optimal: Option<f64>,

    /// Allowed relative excess over `optimal` (0.0 means exact).
    pub stop_percent: f64,
}

impl Default for StopCondition {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            optimal: None,
            stop_percent: 0.0,
        }
    }
}

impl StopCondition {
    /// Runs for exactly `max_iterations` (unless cancelled).
    pub fn iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the iteration bound.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Enables early stopping once the best score is within `stop_percent`
    /// of `optimal`.
    pub fn with_target(mut self, optimal: f64, stop_percent: f64) -> Self {
        self.optimal = Some(optimal);
        self.stop_percent = stop_percent;
        self
    }

    /// Drops the early-stop target.
    pub fn without_target(mut self) -> Self {
        self.optimal = None;
        self
    }

    /// Relative excess of `best` over the optimal reference, if one is set.
    pub fn excess(&self, best: f64) -> Option<f64> {
        match self.optimal {
            Some(opt) if opt > 0.0 && best.is_finite() => Some(best / opt - 1.0),
            _ => None,
        }
    }

    /// Whether `best` satisfies the early-stop target.
    pub fn target_reached(&self, best: f64) -> bool {
        self.excess(best).is_some_and(|e| e <= self.stop_percent)
    }

    /// Validates the condition.
    pub fn validate(&self) -> HiveResult<()> {
        if self.max_iterations == 0 {
            return Err(HiveError::invalid("max_iterations must be at least 1"));
        }
        if let Some(opt) = self.optimal {
            if !(opt > 0.0 && opt.is_finite()) {
                return Err(HiveError::invalid(format!(
                    "optimal must be positive when a stop percentage is requested, got {opt}"
                )));
            }
        }
        if !(self.stop_percent >= 0.0 && self.stop_percent.is_finite()) {
            return Err(HiveError::invalid(format!(
                "stop_percent must be non-negative, got {}",
                self.stop_percent
            )));
        }
        Ok(())
    }
}

/// Configuration for the Ant Colony System.
///
/// # Builder Pattern
///
/// ```
/// use u_hive::aco::{AcsConfig, StopCondition};
///
/// let config = AcsConfig::default()
///     .with_num_ants(10)
///     .with_greedy_prob(0.9)
///     .with_stop(StopCondition::iterations(200))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcsConfig {
    pub params: AcoParams,
    pub stop: StopCondition,

    /// Weight of the local update toward the base level, in `[0, 1]`.
    pub epsilon: f64,

    /// Base pheromone level. `None` derives it from a greedy tour as
    /// `1 / (n * greedy_cost)`.
    pub base_tau: Option<f64>,

    /// Probability of taking the greedy rule at each construction step.
    pub greedy_prob: f64,

    /// Random seed. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            params: AcoParams::default(),
            stop: StopCondition::default(),
            epsilon: 0.1,
            base_tau: None,
            greedy_prob: 0.9,
            seed: None,
        }
    }
}

impl AcsConfig {
    /// Replaces the shared parameters.
    pub fn with_params(mut self, params: AcoParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the number of ants.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.params.num_ants = n;
        self
    }

    /// Replaces the stop condition.
    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the local update weight.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.clamp(0.0, 1.0);
        self
    }

    /// Overrides the bootstrapped base pheromone level.
    pub fn with_base_tau(mut self, base_tau: f64) -> Self {
        self.base_tau = Some(base_tau);
        self
    }

    /// Sets the greedy rule probability.
    pub fn with_greedy_prob(mut self, p: f64) -> Self {
        self.greedy_prob = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> HiveResult<()> {
        self.params.validate()?;
        self.stop.validate()?;
        check_unit("epsilon", self.epsilon)?;
        check_unit("greedy_prob", self.greedy_prob)?;
        if let Some(tau) = self.base_tau {
            if !(tau > 0.0 && tau.is_finite()) {
                return Err(HiveError::invalid(format!("base_tau must be positive, got {tau}")));
            }
        }
        Ok(())
    }
}

/// Configuration for the Elitist Ant System.
///
/// ```
/// use u_hive::aco::EasConfig;
///
/// let config = EasConfig::default().with_num_ants(15).with_elitism_factor(15.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EasConfig {
    pub params: AcoParams,
    pub stop: StopCondition,

    /// Extra reinforcement on best-tour edges, in units of `1 / best_score`.
    /// Commonly set equal to the number of ants.
    pub elitism_factor: f64,

    /// Random seed. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EasConfig {
    fn default() -> Self {
        let params = AcoParams::default();
        Self {
            elitism_factor: params.num_ants as f64,
            params,
            stop: StopCondition::default(),
            seed: None,
        }
    }
}

impl EasConfig {
    /// Replaces the shared parameters.
    pub fn with_params(mut self, params: AcoParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the number of ants.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.params.num_ants = n;
        self
    }

    /// Replaces the stop condition.
    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the elitism factor.
    pub fn with_elitism_factor(mut self, e: f64) -> Self {
        self.elitism_factor = e;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// EAS derives its base level as `(e + m) / (rho * greedy_cost)`, so
    /// `rho` must be strictly positive here.
    pub fn validate(&self) -> HiveResult<()> {
        self.params.validate()?;
        self.stop.validate()?;
        if self.params.rho == 0.0 {
            return Err(HiveError::invalid("rho must be positive for EAS"));
        }
        if !(self.elitism_factor >= 0.0 && self.elitism_factor.is_finite()) {
            return Err(HiveError::invalid(format!(
                "elitism_factor must be non-negative, got {}",
                self.elitism_factor
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_unit(name: &str, value: f64) -> HiveResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(HiveError::invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}

fn check_exponent(name: &str, value: f64) -> HiveResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(HiveError::invalid(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AcoParams::default().validate().is_ok());
        assert!(StopCondition::default().validate().is_ok());
        assert!(AcsConfig::default().validate().is_ok());
        assert!(EasConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rates_are_clamped() {
        let c = AcsConfig::default().with_epsilon(1.5).with_greedy_prob(-0.2);
        assert_eq!(c.epsilon, 1.0);
        assert_eq!(c.greedy_prob, 0.0);
        assert_eq!(AcoParams::default().with_rho(2.0).rho, 1.0);
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        let mut c = AcsConfig::default();
        c.epsilon = 1.5;
        assert!(c.validate().is_err());

        let c = AcsConfig::default().with_num_ants(0);
        assert!(c.validate().is_err());

        let mut p = AcoParams::default();
        p.beta = f64::NAN;
        assert!(p.validate().is_err());

        let c = AcsConfig::default().with_base_tau(0.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_eas_requires_positive_rho() {
        let c = EasConfig::default().with_params(AcoParams::default().with_rho(0.0));
        assert!(c.validate().is_err());
        let c = EasConfig::default().with_elitism_factor(-1.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_target_requires_positive_optimal() {
        let stop = StopCondition::iterations(10).with_target(0.0, 0.05);
        assert!(stop.validate().is_err(), "optimal 0 with a stop percent must be rejected");
        let stop = StopCondition::iterations(10).with_target(100.0, -0.1);
        assert!(stop.validate().is_err());
        assert!(StopCondition::iterations(0).validate().is_err());
    }

    #[test]
    fn test_target_reached() {
        let stop = StopCondition::iterations(10).with_target(100.0, 0.05);
        assert!(stop.target_reached(105.0));
        assert!(!stop.target_reached(105.5));
        assert!(!StopCondition::iterations(10).target_reached(0.0));
    }

    #[test]
    fn test_excess_without_positive_optimal() {
        let mut stop = StopCondition::iterations(10);
        stop.optimal = Some(-3.0);
        assert_eq!(stop.excess(10.0), None);
        assert!(!stop.target_reached(0.0));
    }
}
