/// Defines an ODE (ordinary differential equation) problem with `N` state
/// variables.
///
/// An ODE problem extracts a state vector from model input, reads the state
/// derivative from model output, and reconstructs model input from a time and
/// an updated state. This lets generic ODE solvers integrate any [`Model`]
/// whose dynamics can be written as `dy/dt = f(t, y)` with `y: [f64; N]`.
///
/// The order of values in the state array must match the order of values in
/// the derivative array.
///
/// [`Model`]: crate::Model
pub trait OdeProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the state vector from model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted from the input.
    fn state(&self, input: &Self::Input) -> Result<[f64; N], Self::Error>;

    /// Extracts the time derivative of the state from model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; N], Self::Error>;

    /// Builds model input for a given time and state.
    ///
    /// The `base` input is the initial input passed to the solver, so any
    /// values that are not part of the integrated state carry through
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed.
    fn build_input(
        &self,
        base: &Self::Input,
        time: f64,
        state: &[f64; N],
    ) -> Result<Self::Input, Self::Error>;
}
