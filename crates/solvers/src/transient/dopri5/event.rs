use contagion_core::Snapshot;

/// Event emitted by the Dormand–Prince solver at each sample time.
///
/// Sample 0 is the initial state before any integration.
#[derive(Debug, Clone)]
pub struct Event<I, O> {
    /// Index of the sample time that was reached.
    pub sample: usize,

    /// The sample time.
    pub time: f64,

    /// Snapshot of the model input and output at this sample time.
    pub snapshot: Snapshot<I, O>,
}
