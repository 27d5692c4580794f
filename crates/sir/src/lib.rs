//! Reactive SIR epidemic simulation.
//!
//! A population is split into three compartments (susceptible, infectious,
//! removed) whose fractions evolve under
//!
//! ```text
//! dS/dt = -β · I · S
//! dI/dt =  β · I · S − γ · I
//! dR/dt =  γ · I
//! ```
//!
//! where β is the infection rate and γ the removal rate. The [`Engine`] owns
//! the initial state, the parameters and a fixed [`TimeDomain`]; every
//! parameter change re-simulates from the initial time with an adaptive
//! Dormand–Prince integrator and publishes the fresh [`Trajectory`] to
//! subscribers.
//!
//! # Example
//!
//! ```ignore
//! use contagion::{CompartmentState, Engine, Parameters, TimeDomain};
//!
//! let mut engine = Engine::new();
//! engine.initialize(
//!     CompartmentState::new(0.99, 0.01, 0.0),
//!     Parameters::new(0.15, 0.02),
//!     TimeDomain::linspace(0.0, 150.0, 1000)?,
//! )?;
//!
//! engine.subscribe(|publication: &contagion::Publication<'_>| {
//!     redraw(publication.trajectory);
//!     None
//! });
//!
//! engine.run()?;
//! engine.update_parameters(0.3, 0.01)?;
//! ```
//!
//! # Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` for the data types and
//!   [`EngineConfig`], so a host can load a session from TOML or JSON.

mod compartments;
mod config;
mod engine;
mod error;
mod model;
mod parameters;
mod time_domain;
mod trajectory;

pub use compartments::{CompartmentState, STATE_SUM_TOLERANCE};
pub use config::{EngineConfig, SolverSettings};
pub use engine::{Action, Engine, Publication, SubscriptionId};
pub use error::{ConfigError, Error};
pub use model::{SirInput, SirModel, SirProblem};
pub use parameters::{INFECTION_RATE_RANGE, Parameter, ParameterRange, Parameters, REMOVAL_RATE_RANGE};
pub use time_domain::TimeDomain;
pub use trajectory::{Peak, Trajectory};

pub use contagion_solvers::transient::dopri5;
