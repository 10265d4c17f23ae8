//! Configuration validation with range checks.

use crate::engine::COLD_START_STEPS;
use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.horizon == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.horizon must be > 0".into(),
            ));
        }
        if let Some(burnin) = self.simulation.burnin {
            if burnin <= COLD_START_STEPS {
                return Err(ConfigError::ValidationError(format!(
                    "simulation.burnin must be > {COLD_START_STEPS} (the cold-start window)"
                )));
            }
        }
        if self.simulation.users == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.users must be > 0".into(),
            ));
        }
        if !(self.simulation.reward_noise >= 0.0) {
            return Err(ConfigError::ValidationError(
                "simulation.reward_noise must be >= 0".into(),
            ));
        }
        if !(self.simulation.theta_scale > 0.0) {
            return Err(ConfigError::ValidationError(
                "simulation.theta_scale must be > 0".into(),
            ));
        }
        if !(self.model.bandwidth > 0.0) {
            return Err(ConfigError::ValidationError(
                "model.bandwidth must be > 0".into(),
            ));
        }
        if !(self.model.sigma > 0.0) {
            return Err(ConfigError::ValidationError(
                "model.sigma must be > 0".into(),
            ));
        }
        if !(self.model.tolerance > 0.0) {
            return Err(ConfigError::ValidationError(
                "model.tolerance must be > 0".into(),
            ));
        }
        if self.model.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "model.max_iterations must be > 0".into(),
            ));
        }
        if !(self.model.jitter >= 0.0) {
            return Err(ConfigError::ValidationError(
                "model.jitter must be >= 0".into(),
            ));
        }
        if !(self.dataset.train_fraction > 0.0 && self.dataset.train_fraction < 1.0) {
            return Err(ConfigError::ValidationError(
                "dataset.train_fraction must be between 0.0 and 1.0 (exclusive)".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_burnin_inside_cold_start() {
        let mut config = Config::default();
        config.simulation.burnin = Some(3);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("burnin"));

        config.simulation.burnin = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let mut config = Config::default();
        config.simulation.horizon = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("horizon"));
    }

    #[test]
    fn test_validate_rejects_non_positive_bandwidth() {
        let mut config = Config::default();
        config.model.bandwidth = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bandwidth"));

        config.model.bandwidth = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_train_fraction() {
        let mut config = Config::default();
        config.dataset.train_fraction = 1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("train_fraction"));

        config.dataset.train_fraction = 0.0;
        assert!(config.validate().is_err());
    }
}
