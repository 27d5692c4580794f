use std::sync::Arc;

use crate::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The sample times at which a simulation reports compartment values.
///
/// A time domain holds at least two finite, strictly increasing points. It is
/// immutable once built, and cloning it is cheap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct TimeDomain {
    points: Arc<[f64]>,
}

impl TimeDomain {
    /// Creates a time domain from explicit sample times.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two points, if any point is
    /// not finite, or if the points are not strictly increasing.
    pub fn new(points: Vec<f64>) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::TooFewPoints {
                count: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|t| !t.is_finite()) {
            return Err(ConfigError::NonFiniteTime { index });
        }
        if let Some(index) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ConfigError::NotIncreasing { index: index + 1 });
        }

        Ok(Self {
            points: points.into(),
        })
    }

    /// Creates `count` evenly spaced sample times from `start` to `end`,
    /// including both endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if `count < 2`, if an endpoint is not finite, or if
    /// `end <= start`.
    pub fn linspace(start: f64, end: f64, count: usize) -> Result<Self, ConfigError> {
        if count < 2 {
            return Err(ConfigError::TooFewPoints { count });
        }
        if !start.is_finite() {
            return Err(ConfigError::NonFiniteTime { index: 0 });
        }
        if !end.is_finite() {
            return Err(ConfigError::NonFiniteTime { index: count - 1 });
        }

        let last = count - 1;
        let points = (0..count)
            .map(|i| match i {
                0 => start,
                i if i == last => end,
                i => start + (end - start) * (i as f64) / (last as f64),
            })
            .collect();

        Self::new(points)
    }

    /// Returns the sample times.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Returns the number of sample times.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a time domain holds at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the first sample time.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.points[0]
    }

    /// Returns the last sample time.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}

impl Default for TimeDomain {
    /// 1000 evenly spaced points over 150 days.
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::linspace(0.0, 150.0, 1000).unwrap()
    }
}

impl TryFrom<Vec<f64>> for TimeDomain {
    type Error = ConfigError;

    fn try_from(points: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TimeDomain> for Vec<f64> {
    fn from(domain: TimeDomain) -> Self {
        domain.points.to_vec()
    }
}
