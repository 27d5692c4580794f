use crate::{CompartmentState, ConfigError, Parameters, TimeDomain, dopri5};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything needed to build a ready [`Engine`](crate::Engine).
///
/// The default reproduces the reference session: 1% infectious, β = 0.15,
/// γ = 0.02, and 1000 samples over 150 days.
///
/// With the `serde` feature, every field is optional when deserializing and
/// falls back to its default:
///
/// ```toml
/// horizon = 200.0
///
/// [parameters]
/// infection_rate = 0.3
/// removal_rate = 0.01
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct EngineConfig {
    pub initial_state: CompartmentState,
    pub parameters: Parameters,

    /// Last sample time, in days. Sampling starts at zero.
    pub horizon: f64,

    /// Number of evenly spaced sample times, including both endpoints.
    pub samples: usize,

    pub solver: SolverSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_state: CompartmentState::new(0.99, 0.01, 0.0),
            parameters: Parameters::default(),
            horizon: 150.0,
            samples: 1000,
            solver: SolverSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Returns `samples` evenly spaced times over `[0, horizon]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples < 2` or `horizon` is not finite and
    /// positive.
    pub fn time_domain(&self) -> Result<TimeDomain, ConfigError> {
        TimeDomain::linspace(0.0, self.horizon, self.samples)
    }
}

/// Tolerances and step budget for the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct SolverSettings {
    pub rel_tol: f64,
    pub abs_tol: f64,
    pub max_steps: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        let config = dopri5::Config::default();
        Self {
            rel_tol: config.rel_tol(),
            abs_tol: config.abs_tol(),
            max_steps: config.max_steps(),
        }
    }
}

impl SolverSettings {
    /// Validates the settings into a solver config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Solver`] if a tolerance is not finite and
    /// positive or `max_steps` is zero.
    pub fn to_config(&self) -> Result<dopri5::Config, ConfigError> {
        Ok(dopri5::Config::new(
            self.rel_tol,
            self.abs_tol,
            self.max_steps,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Engine, Error};

    #[test]
    fn default_is_reference_session() {
        let config = EngineConfig::default();
        let times = config.time_domain().unwrap();

        assert_eq!(times, TimeDomain::default());
        assert_eq!(config.parameters, Parameters::new(0.15, 0.02));
        assert_eq!(config.solver.to_config().unwrap(), dopri5::Config::default());
    }

    #[test]
    fn from_config_builds_ready_engine() {
        let engine = Engine::from_config(&EngineConfig::default()).unwrap();

        assert!(engine.is_ready());
        assert!(engine.trajectory().is_none());
        assert_eq!(engine.time_domain().map(TimeDomain::len), Some(1000));
        assert_eq!(engine.solver_config(), &dopri5::Config::default());
    }

    #[test]
    fn from_config_rejects_bad_settings() {
        let config = EngineConfig {
            solver: SolverSettings {
                rel_tol: -1.0,
                ..SolverSettings::default()
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::from_config(&config),
            Err(Error::Configuration(ConfigError::Solver(
                dopri5::ConfigError::RelTol
            )))
        ));

        let config = EngineConfig {
            samples: 1,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::from_config(&config),
            Err(Error::Configuration(ConfigError::TooFewPoints { count: 1 }))
        ));

        let config = EngineConfig {
            initial_state: CompartmentState::new(0.5, 0.1, 0.0),
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::from_config(&config),
            Err(Error::Configuration(ConfigError::StateSum { .. }))
        ));
    }
}
