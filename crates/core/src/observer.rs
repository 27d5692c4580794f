/// A callback that sees events from an event source and may answer with an
/// action for that source.
///
/// The solvers report each sample time to an observer, which can answer
/// `Some(StopEarly)`. The epidemic engine publishes each finished trajectory
/// to its subscribers, which can answer `Some(Unsubscribe)`. `None` always
/// means "carry on".
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer. `()` is the observer
/// that ignores every event.
pub trait Observer<E, A> {
    /// Handles one event, returning the action the source should take, if any.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

/// Ignores every event.
impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
