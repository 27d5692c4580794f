use thiserror::Error;

/// Configuration for the Dormand–Prince solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    rel_tol: f64,
    abs_tol: f64,
    max_steps: usize,
    initial_step: Option<f64>,
    max_step: f64,
}

/// Errors that can occur when validating a Dormand–Prince solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rel_tol must be finite and positive")]
    RelTol,

    #[error("abs_tol must be finite and positive")]
    AbsTol,

    #[error("max_steps must be greater than zero")]
    MaxSteps,

    #[error("initial_step must be finite and positive")]
    InitialStep,

    #[error("max_step must be positive")]
    MaxStep,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-8, 1e-10, 100_000).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances and step budget.
    ///
    /// The initial step is chosen automatically and the step size is
    /// unbounded; see [`Config::with_initial_step`] and
    /// [`Config::with_max_step`].
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is not finite and positive, or if
    /// `max_steps` is zero.
    pub fn new(rel_tol: f64, abs_tol: f64, max_steps: usize) -> Result<Self, ConfigError> {
        if !rel_tol.is_finite() || rel_tol <= 0.0 {
            return Err(ConfigError::RelTol);
        }
        if !abs_tol.is_finite() || abs_tol <= 0.0 {
            return Err(ConfigError::AbsTol);
        }
        if max_steps == 0 {
            return Err(ConfigError::MaxSteps);
        }

        Ok(Self {
            rel_tol,
            abs_tol,
            max_steps,
            initial_step: None,
            max_step: f64::INFINITY,
        })
    }

    /// Sets the size of the first trial step.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not finite and positive.
    pub fn with_initial_step(self, step: f64) -> Result<Self, ConfigError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::InitialStep);
        }
        Ok(Self {
            initial_step: Some(step),
            ..self
        })
    }

    /// Caps the step size. `f64::INFINITY` removes the cap.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is NaN or not positive.
    pub fn with_max_step(self, step: f64) -> Result<Self, ConfigError> {
        if step.is_nan() || step <= 0.0 {
            return Err(ConfigError::MaxStep);
        }
        Ok(Self {
            max_step: step,
            ..self
        })
    }

    /// Returns the relative tolerance for the local error estimate.
    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Returns the absolute tolerance for the local error estimate.
    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Returns the maximum number of attempted steps per solve.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the fixed first trial step, if one was set.
    #[must_use]
    pub fn initial_step(&self) -> Option<f64> {
        self.initial_step
    }

    /// Returns the step size cap.
    #[must_use]
    pub fn max_step(&self) -> f64 {
        self.max_step
    }
}
