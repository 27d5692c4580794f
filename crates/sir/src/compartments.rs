use crate::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted deviation of `S + I + R` from one in an initial state.
pub const STATE_SUM_TOLERANCE: f64 = 1e-9;

/// Population fractions in each compartment.
///
/// The same type carries compartment rates (the time derivative of a state),
/// which is what [`SirModel::derivative`](crate::SirModel::derivative)
/// returns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompartmentState {
    pub susceptible: f64,
    pub infectious: f64,
    pub removed: f64,
}

impl CompartmentState {
    /// Creates a state from susceptible, infectious, and removed fractions.
    #[must_use]
    pub const fn new(susceptible: f64, infectious: f64, removed: f64) -> Self {
        Self {
            susceptible,
            infectious,
            removed,
        }
    }

    /// Returns `S + I + R`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.susceptible + self.infectious + self.removed
    }

    /// Checks that this is a valid starting point for a simulation.
    ///
    /// Every fraction must be finite and non-negative, and the fractions must
    /// sum to one within [`STATE_SUM_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Compartment`] for the first invalid fraction, or
    /// [`ConfigError::StateSum`] if the fractions do not sum to one.
    pub fn check_initial(&self) -> Result<(), ConfigError> {
        let fractions = [
            ("susceptible", self.susceptible),
            ("infectious", self.infectious),
            ("removed", self.removed),
        ];
        for (compartment, value) in fractions {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Compartment { compartment, value });
            }
        }

        let sum = self.total();
        if (sum - 1.0).abs() > STATE_SUM_TOLERANCE {
            return Err(ConfigError::StateSum { sum });
        }
        Ok(())
    }
}

impl From<[f64; 3]> for CompartmentState {
    fn from([susceptible, infectious, removed]: [f64; 3]) -> Self {
        Self::new(susceptible, infectious, removed)
    }
}

impl From<CompartmentState> for [f64; 3] {
    fn from(state: CompartmentState) -> Self {
        [state.susceptible, state.infectious, state.removed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn converts_to_and_from_arrays() {
        let state = CompartmentState::from([0.5, 0.25, 0.25]);
        assert_eq!(state, CompartmentState::new(0.5, 0.25, 0.25));
        assert_eq!(<[f64; 3]>::from(state), [0.5, 0.25, 0.25]);
    }

    #[test]
    fn total_sums_all_compartments() {
        assert_relative_eq!(CompartmentState::new(0.99, 0.01, 0.0).total(), 1.0);
    }

    #[test]
    fn accepts_valid_initial_states() {
        assert_eq!(CompartmentState::new(0.99, 0.01, 0.0).check_initial(), Ok(()));
        assert_eq!(CompartmentState::new(1.0, 0.0, 0.0).check_initial(), Ok(()));
        assert_eq!(
            CompartmentState::new(0.7, 0.2, 0.1 + 5e-10).check_initial(),
            Ok(())
        );
    }

    #[test]
    fn rejects_states_that_do_not_sum_to_one() {
        let err = CompartmentState::new(0.9, 0.01, 0.0).check_initial().unwrap_err();
        assert!(matches!(err, ConfigError::StateSum { sum } if (sum - 0.91).abs() < 1e-12));
    }

    #[test]
    fn rejects_negative_or_non_finite_fractions() {
        assert_eq!(
            CompartmentState::new(1.1, -0.1, 0.0).check_initial(),
            Err(ConfigError::Compartment {
                compartment: "infectious",
                value: -0.1
            })
        );
        assert!(matches!(
            CompartmentState::new(f64::NAN, 0.0, 1.0).check_initial(),
            Err(ConfigError::Compartment {
                compartment: "susceptible",
                ..
            })
        ));
    }
}
