//! Numerical solvers for the Contagion workspace.
//!
//! # Modules
//!
//! - [`transient`]: time integration of [`OdeProblem`]s
//!
//! [`OdeProblem`]: contagion_core::OdeProblem

pub mod transient;
