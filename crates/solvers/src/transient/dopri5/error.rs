use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur during Dormand–Prince integration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid sample times: {0}")]
    InvalidTimes(#[from] TimesError),

    #[error("step budget of {steps} exhausted at t = {time}")]
    MaxSteps { time: f64, steps: usize },

    #[error("step size {step:e} underflowed at t = {time}")]
    StepSizeUnderflow { time: f64, step: f64 },

    #[error("state or derivative is not finite at t = {time}")]
    NonFinite { time: f64 },

    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }
}

/// Reasons a sequence of sample times is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimesError {
    #[error("no sample times given")]
    Empty,

    #[error("sample time at index {index} is not finite")]
    NonFinite { index: usize },

    #[error("sample time at index {index} does not increase")]
    NotIncreasing { index: usize },
}

/// Checks that sample times are non-empty, finite, and strictly increasing.
pub(crate) fn check_times(times: &[f64]) -> Result<(), TimesError> {
    if times.is_empty() {
        return Err(TimesError::Empty);
    }
    if let Some(index) = times.iter().position(|t| !t.is_finite()) {
        return Err(TimesError::NonFinite { index });
    }
    if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(TimesError::NotIncreasing { index: index + 1 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_increasing_times() {
        assert_eq!(check_times(&[0.0]), Ok(()));
        assert_eq!(check_times(&[0.0, 0.5, 3.0]), Ok(()));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(check_times(&[]), Err(TimesError::Empty));
        assert_eq!(
            check_times(&[0.0, f64::NAN]),
            Err(TimesError::NonFinite { index: 1 })
        );
        assert_eq!(
            check_times(&[0.0, 1.0, 1.0]),
            Err(TimesError::NotIncreasing { index: 2 })
        );
        assert_eq!(
            check_times(&[2.0, 1.0]),
            Err(TimesError::NotIncreasing { index: 1 })
        );
    }
}
