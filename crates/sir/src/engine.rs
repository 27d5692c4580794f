mod subscribers;

use contagion_core::Observer;
use log::{debug, info, warn};

use crate::{
    CompartmentState, ConfigError, EngineConfig, Error, Parameters, SirInput, SirModel,
    SirProblem, TimeDomain, Trajectory, dopri5,
};

pub use subscribers::{Action, Publication, SubscriptionId};

use subscribers::Subscribers;

/// Re-simulates the SIR model whenever its parameters change.
///
/// An engine starts uninitialized. [`Engine::initialize`] fixes the initial
/// state and time domain for the lifetime of the engine; afterwards
/// [`Engine::run`] and [`Engine::update_parameters`] integrate from the initial
/// state over the whole time domain and publish the resulting [`Trajectory`]
/// to every subscriber.
///
/// The engine is single-threaded and synchronous: each call blocks until the
/// trajectory is complete.
#[derive(Debug)]
pub struct Engine {
    solver: dopri5::Config,
    state: State,
    subscribers: Subscribers,
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Ready(Session),
}

/// Inputs fixed by `initialize`, plus the current parameters and trajectory.
#[derive(Debug)]
struct Session {
    initial_state: CompartmentState,
    parameters: Parameters,
    time_domain: TimeDomain,
    trajectory: Option<Trajectory>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an uninitialized engine with the default solver config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_solver_config(dopri5::Config::default())
    }

    /// Creates an uninitialized engine that integrates with `solver`.
    #[must_use]
    pub fn with_solver_config(solver: dopri5::Config) -> Self {
        Self {
            solver,
            state: State::Uninitialized,
            subscribers: Subscribers::default(),
        }
    }

    /// Builds an initialized engine from a session config.
    ///
    /// The engine is ready but has not run yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the solver settings, time domain,
    /// initial state, or parameters are invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self, Error> {
        let mut engine = Self::with_solver_config(config.solver.to_config()?);
        engine.initialize(config.initial_state, config.parameters, config.time_domain()?)?;
        Ok(engine)
    }

    /// Fixes the initial state and time domain and sets the starting
    /// parameters.
    ///
    /// This does not run a simulation.
    ///
    /// Any finite, non-negative rates are accepted here, including rates
    /// outside the ranges enforced by [`Engine::update_parameters`]. The
    /// integrator is explicit, so very large rates make the equations stiff
    /// and [`Engine::run`] may exhaust the solver's step budget, which is
    /// reported as [`Error::Integration`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the engine is already initialized,
    /// if the initial fractions are negative, non-finite, or do not sum to one,
    /// or if a parameter is negative or non-finite.
    pub fn initialize(
        &mut self,
        initial_state: CompartmentState,
        parameters: Parameters,
        time_domain: TimeDomain,
    ) -> Result<(), Error> {
        if self.is_ready() {
            return Err(ConfigError::AlreadyInitialized.into());
        }
        initial_state.check_initial()?;
        parameters.check_non_negative()?;

        info!(
            "initialized with {initial_state:?}, {parameters:?}, {} samples over [{}, {}]",
            time_domain.len(),
            time_domain.start(),
            time_domain.end(),
        );

        self.state = State::Ready(Session {
            initial_state,
            parameters,
            time_domain,
            trajectory: None,
        });
        Ok(())
    }

    /// Simulates the whole time domain with the current parameters.
    ///
    /// On success the new trajectory replaces the previous one and is
    /// published to subscribers. On failure the previous trajectory is
    /// discarded and nothing is published.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`Engine::initialize`], or
    /// [`Error::Integration`] if the solver fails.
    pub fn run(&mut self) -> Result<&Trajectory, Error> {
        let Self {
            solver,
            state,
            subscribers,
        } = self;
        let State::Ready(session) = state else {
            return Err(Error::NotInitialized);
        };

        session.trajectory = None;
        let trajectory: &Trajectory = match simulate(session, solver) {
            Ok(trajectory) => session.trajectory.insert(trajectory),
            Err(error) => {
                warn!("simulation with {:?} failed: {error}", session.parameters);
                return Err(error);
            }
        };

        subscribers.publish(&Publication {
            parameters: session.parameters,
            trajectory,
        });
        Ok(trajectory)
    }

    /// Replaces the parameters and re-simulates from the initial state.
    ///
    /// Values outside [`INFECTION_RATE_RANGE`](crate::INFECTION_RATE_RANGE)
    /// or [`REMOVAL_RATE_RANGE`](crate::REMOVAL_RATE_RANGE) are rejected, not
    /// clamped, and leave the engine unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`Engine::initialize`],
    /// [`Error::Configuration`] for an out-of-range value, or
    /// [`Error::Integration`] if the solver fails. After an integration
    /// failure the new parameters are kept and no trajectory is stored.
    pub fn update_parameters(
        &mut self,
        infection_rate: f64,
        removal_rate: f64,
    ) -> Result<&Trajectory, Error> {
        let State::Ready(session) = &mut self.state else {
            return Err(Error::NotInitialized);
        };

        let parameters = Parameters::new(infection_rate, removal_rate);
        if let Err(error) = parameters.check_ranges() {
            warn!("rejected parameter update: {error}");
            return Err(error.into());
        }

        info!("updating parameters to {parameters:?}");
        session.parameters = parameters;
        self.run()
    }

    /// Registers a subscriber for every future publication.
    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: for<'a> Observer<Publication<'a>, Action> + 'static,
    {
        self.subscribers.add(observer)
    }

    /// Removes a subscriber, returning `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` once [`Engine::initialize`] has succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    #[must_use]
    pub fn parameters(&self) -> Option<Parameters> {
        self.session().map(|session| session.parameters)
    }

    #[must_use]
    pub fn initial_state(&self) -> Option<CompartmentState> {
        self.session().map(|session| session.initial_state)
    }

    #[must_use]
    pub fn time_domain(&self) -> Option<&TimeDomain> {
        self.session().map(|session| &session.time_domain)
    }

    /// Returns the trajectory from the last successful run, if any.
    #[must_use]
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.session()?.trajectory.as_ref()
    }

    #[must_use]
    pub fn solver_config(&self) -> &dopri5::Config {
        &self.solver
    }

    fn session(&self) -> Option<&Session> {
        match &self.state {
            State::Uninitialized => None,
            State::Ready(session) => Some(session),
        }
    }
}

fn simulate(session: &Session, solver: &dopri5::Config) -> Result<Trajectory, Error> {
    let model = SirModel::new(session.parameters);
    let initial = SirInput {
        time: session.time_domain.start(),
        state: session.initial_state,
    };

    let solution = dopri5::solve_unobserved(
        &model,
        &SirProblem,
        initial,
        session.time_domain.points(),
        solver,
    )?;

    let stats = solution.stats;
    debug!(
        "simulated {:?}: {} accepted, {} rejected, {} evaluations",
        session.parameters, stats.accepted, stats.rejected, stats.evaluations,
    );

    Ok(Trajectory::from_states(
        session.time_domain.clone(),
        solution
            .history
            .into_iter()
            .map(|snapshot| snapshot.input.state),
    ))
}
