/// A pure function from a typed input to a typed output.
///
/// Solvers call a model many times per step with trial inputs, so a model must
/// give the same output for the same input and hold no mutable state. In the
/// epidemic crate the input is a time and compartment state, and the output is
/// the compartment rates.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates the model at `input`.
    ///
    /// # Errors
    ///
    /// Returns the model's own error if it cannot be evaluated at `input`.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// An input together with the output the model produced for it.
///
/// Solver histories are lists of snapshots, one per sample time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}
