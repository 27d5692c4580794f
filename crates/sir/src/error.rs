use thiserror::Error;

use crate::{Parameter, dopri5};

/// Errors returned by the [`Engine`](crate::Engine).
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("integration error: {0}")]
    Integration(#[from] dopri5::Error),

    #[error("engine has not been initialized")]
    NotInitialized,
}

/// Reasons an initial state, parameter set, time domain, or solver setting is
/// rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial compartments sum to {sum}, expected 1")]
    StateSum { sum: f64 },

    #[error("initial {compartment} fraction {value} is negative or not finite")]
    Compartment {
        compartment: &'static str,
        value: f64,
    },

    #[error("{parameter} {value} is negative or not finite")]
    NegativeParameter { parameter: Parameter, value: f64 },

    #[error("{parameter} {value} is outside [{min}, {max}]")]
    OutOfRange {
        parameter: Parameter,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("time domain needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("time domain point {index} is not finite")]
    NonFiniteTime { index: usize },

    #[error("time domain is not strictly increasing at index {index}")]
    NotIncreasing { index: usize },

    #[error("engine is already initialized")]
    AlreadyInitialized,

    #[error("invalid solver settings: {0}")]
    Solver(#[from] dopri5::ConfigError),
}
