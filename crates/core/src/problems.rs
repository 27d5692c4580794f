pub mod ode;

pub use ode::OdeProblem;
