use std::fmt;

use crate::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported infection rates, matching the infection rate slider.
pub const INFECTION_RATE_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 1.0,
    step: 0.001,
};

/// Supported removal rates, matching the removal rate slider.
pub const REMOVAL_RATE_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 0.05,
    step: 0.0001,
};

/// Names a model parameter in error messages and range lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    InfectionRate,
    RemovalRate,
}

impl Parameter {
    /// Returns the range accepted by parameter updates.
    #[must_use]
    pub fn range(self) -> ParameterRange {
        match self {
            Self::InfectionRate => INFECTION_RATE_RANGE,
            Self::RemovalRate => REMOVAL_RATE_RANGE,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InfectionRate => f.write_str("infection rate"),
            Self::RemovalRate => f.write_str("removal rate"),
        }
    }
}

/// The rates driving the SIR equations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    /// β, the rate at which susceptible individuals become infectious.
    pub infection_rate: f64,

    /// γ, the rate at which infectious individuals are removed.
    pub removal_rate: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new(0.15, 0.02)
    }
}

impl Parameters {
    /// Creates a parameter set. No validation happens here.
    #[must_use]
    pub const fn new(infection_rate: f64, removal_rate: f64) -> Self {
        Self {
            infection_rate,
            removal_rate,
        }
    }

    /// Returns the basic reproduction number `β · S₀ / γ`.
    ///
    /// The result follows IEEE division: infinite when `γ = 0` and `β · S₀ > 0`,
    /// NaN when both are zero.
    #[must_use]
    pub fn basic_reproduction_number(&self, susceptible: f64) -> f64 {
        self.infection_rate * susceptible / self.removal_rate
    }

    /// Checks that both rates are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NegativeParameter`] for the first invalid rate.
    pub fn check_non_negative(&self) -> Result<(), ConfigError> {
        for (parameter, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeParameter { parameter, value });
            }
        }
        Ok(())
    }

    /// Checks that both rates lie within [`INFECTION_RATE_RANGE`] and
    /// [`REMOVAL_RATE_RANGE`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first rate outside its range.
    pub fn check_ranges(&self) -> Result<(), ConfigError> {
        for (parameter, value) in self.entries() {
            parameter.range().check(parameter, value)?;
        }
        Ok(())
    }

    fn entries(&self) -> [(Parameter, f64); 2] {
        [
            (Parameter::InfectionRate, self.infection_rate),
            (Parameter::RemovalRate, self.removal_rate),
        ]
    }
}

/// Bounds and granularity of a parameter control.
///
/// The engine only uses `min` and `max`, rejecting anything outside them.
/// `step` describes the control's resolution for widget layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterRange {
    /// Returns `true` if `value` is finite and within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Rounds `value` to the nearest step and limits it to the range.
    ///
    /// This is a helper for widgets that quantize user input. The engine
    /// never snaps; it rejects out-of-range values instead.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    fn check(&self, parameter: Parameter, value: f64) -> Result<(), ConfigError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                parameter,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_matches_reference_session() {
        assert_eq!(Parameters::default(), Parameters::new(0.15, 0.02));
    }

    #[test]
    fn reproduction_number() {
        let parameters = Parameters::new(0.15, 0.02);
        assert_relative_eq!(
            parameters.basic_reproduction_number(0.99),
            7.425,
            max_relative = 1e-12
        );

        assert!(Parameters::new(0.1, 0.0)
            .basic_reproduction_number(1.0)
            .is_infinite());
        assert!(Parameters::new(0.0, 0.0)
            .basic_reproduction_number(1.0)
            .is_nan());
    }

    #[test]
    fn non_negative_check() {
        assert_eq!(Parameters::new(0.0, 0.0).check_non_negative(), Ok(()));
        assert_eq!(Parameters::new(3.0, 0.5).check_non_negative(), Ok(()));
        assert_eq!(
            Parameters::new(-0.1, 0.02).check_non_negative(),
            Err(ConfigError::NegativeParameter {
                parameter: Parameter::InfectionRate,
                value: -0.1
            })
        );
        assert!(matches!(
            Parameters::new(0.1, f64::INFINITY).check_non_negative(),
            Err(ConfigError::NegativeParameter {
                parameter: Parameter::RemovalRate,
                ..
            })
        ));
    }

    #[test]
    fn range_check_accepts_bounds() {
        assert_eq!(Parameters::new(0.0, 0.0).check_ranges(), Ok(()));
        assert_eq!(Parameters::new(1.0, 0.05).check_ranges(), Ok(()));
    }

    #[test]
    fn range_check_rejects_rather_than_clamps() {
        assert_eq!(
            Parameters::new(1.001, 0.02).check_ranges(),
            Err(ConfigError::OutOfRange {
                parameter: Parameter::InfectionRate,
                value: 1.001,
                min: 0.0,
                max: 1.0
            })
        );
        assert_eq!(
            Parameters::new(0.5, 0.06).check_ranges(),
            Err(ConfigError::OutOfRange {
                parameter: Parameter::RemovalRate,
                value: 0.06,
                min: 0.0,
                max: 0.05
            })
        );
        assert!(Parameters::new(f64::NAN, 0.02).check_ranges().is_err());
    }

    #[test]
    fn snap_rounds_to_step_within_range() {
        assert_relative_eq!(INFECTION_RATE_RANGE.snap(0.1504), 0.15, max_relative = 1e-12);
        assert_relative_eq!(REMOVAL_RATE_RANGE.snap(0.02004), 0.02, max_relative = 1e-12);
        assert_relative_eq!(INFECTION_RATE_RANGE.snap(1.7), 1.0);
        assert_relative_eq!(REMOVAL_RATE_RANGE.snap(-0.3), 0.0);
    }

    #[test]
    fn parameter_names_display() {
        assert_eq!(Parameter::InfectionRate.to_string(), "infection rate");
        assert_eq!(Parameter::RemovalRate.range(), REMOVAL_RATE_RANGE);
    }
}
