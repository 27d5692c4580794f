use contagion_core::Snapshot;

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached every requested sample time.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// Work counters for a single solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Steps whose local error estimate met the tolerances.
    pub accepted: usize,

    /// Steps that were retried with a smaller step size.
    pub rejected: usize,

    /// Number of model calls.
    pub evaluations: usize,
}

/// The result of a Dormand–Prince integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// How the solver terminated.
    pub status: Status,

    /// One snapshot per sample time reached, starting with the initial state.
    pub history: Vec<Snapshot<I, O>>,

    /// Work done to produce the history.
    pub stats: Stats,
}
