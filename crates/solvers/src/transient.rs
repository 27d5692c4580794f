//! Solvers that integrate ODE problems forward in time.
//!
//! # Solvers
//!
//! - [`dopri5`]: adaptive Dormand–Prince 5(4) with exact landing on sample times

pub mod dopri5;
