//! Core traits and types for the Contagion workspace.
//!
//! This crate defines the shared abstractions that the solver and the
//! epidemic engine build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives events and optionally returns control actions
//! - [`OdeProblem`]: adapts a model's input and output to a fixed-size state
//!   vector so generic ODE solvers can integrate it

mod model;
mod observer;
mod problems;

pub use observer::Observer;
pub use problems::OdeProblem;
pub use {model::Model, model::Snapshot};
