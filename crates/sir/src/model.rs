use std::convert::Infallible;

use contagion_core::{Model, OdeProblem};

use crate::{CompartmentState, Parameters};

/// The SIR equations for a fixed parameter snapshot.
///
/// ```text
/// dS/dt = -β · I · S
/// dI/dt =  β · I · S − γ · I
/// dR/dt =  γ · I
/// ```
///
/// The model is a pure function of its parameters and the state it is given.
/// It accepts any real state and does not require `S + I + R = 1`; the
/// equations conserve whatever total they start with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirModel {
    parameters: Parameters,
}

/// Model input: a compartment state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirInput {
    pub time: f64,
    pub state: CompartmentState,
}

impl SirModel {
    #[must_use]
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }

    /// Returns the parameter snapshot this model was built with.
    #[must_use]
    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Returns the rate of change of each compartment.
    ///
    /// The equations are autonomous, so `time` does not affect the result.
    #[must_use]
    pub fn derivative(&self, state: CompartmentState, _time: f64) -> CompartmentState {
        let Parameters {
            infection_rate,
            removal_rate,
        } = self.parameters;

        let infections = infection_rate * state.infectious * state.susceptible;
        let removals = removal_rate * state.infectious;

        CompartmentState {
            susceptible: -infections,
            infectious: infections - removals,
            removed: removals,
        }
    }
}

impl Model for SirModel {
    type Input = SirInput;
    type Output = CompartmentState;
    type Error = Infallible;

    fn call(&self, input: &SirInput) -> Result<CompartmentState, Infallible> {
        Ok(self.derivative(input.state, input.time))
    }
}

/// Maps [`SirModel`] input and output onto the `[S, I, R]` state vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SirProblem;

impl OdeProblem<3> for SirProblem {
    type Input = SirInput;
    type Output = CompartmentState;
    type Error = Infallible;

    fn state(&self, input: &SirInput) -> Result<[f64; 3], Infallible> {
        Ok(input.state.into())
    }

    fn derivative(
        &self,
        _input: &SirInput,
        output: &CompartmentState,
    ) -> Result<[f64; 3], Infallible> {
        Ok((*output).into())
    }

    fn build_input(
        &self,
        _base: &SirInput,
        time: f64,
        state: &[f64; 3],
    ) -> Result<SirInput, Infallible> {
        Ok(SirInput {
            time,
            state: (*state).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn model(infection_rate: f64, removal_rate: f64) -> SirModel {
        SirModel::new(Parameters::new(infection_rate, removal_rate))
    }

    #[test]
    fn keeps_its_parameter_snapshot() {
        let sir = model(0.3, 0.01);
        assert_eq!(sir.parameters(), Parameters::new(0.3, 0.01));
    }

    #[test]
    fn evaluates_sir_equations() {
        let rates = model(0.15, 0.02).derivative(CompartmentState::new(0.99, 0.01, 0.0), 0.0);

        assert_relative_eq!(rates.susceptible, -0.001485, max_relative = 1e-12);
        assert_relative_eq!(rates.infectious, 0.001285, max_relative = 1e-12);
        assert_relative_eq!(rates.removed, 0.0002, max_relative = 1e-12);
    }

    #[test]
    fn rates_sum_to_zero() {
        let state = CompartmentState::new(0.4, 0.35, 0.25);
        for (beta, gamma) in [(0.0, 0.0), (0.3, 0.01), (1.0, 0.05), (0.72, 0.0)] {
            let rates = model(beta, gamma).derivative(state, 12.0);
            assert_relative_eq!(rates.total(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn no_infectious_means_no_change() {
        let rates = model(0.9, 0.04).derivative(CompartmentState::new(0.7, 0.0, 0.3), 3.0);
        assert_eq!(<[f64; 3]>::from(rates).map(f64::abs), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn accepts_states_off_the_simplex() {
        let rates = model(0.5, 0.1).derivative(CompartmentState::new(2.0, -1.0, 0.5), 0.0);
        assert_relative_eq!(rates.susceptible, 1.0, max_relative = 1e-12);
        assert_relative_eq!(rates.infectious, -0.9, max_relative = 1e-12);
        assert_relative_eq!(rates.removed, -0.1, max_relative = 1e-12);
    }

    #[test]
    fn model_call_matches_derivative() {
        let sir = model(0.2, 0.03);
        let input = SirInput {
            time: 7.0,
            state: CompartmentState::new(0.6, 0.3, 0.1),
        };

        let output = sir.call(&input).unwrap();

        assert_eq!(output, sir.derivative(input.state, input.time));
        assert_eq!(SirProblem.derivative(&input, &output).unwrap(), <[f64; 3]>::from(output));
    }

    #[test]
    fn problem_rebuilds_input_from_state() {
        let base = SirInput {
            time: 0.0,
            state: CompartmentState::new(1.0, 0.0, 0.0),
        };

        let input = SirProblem.build_input(&base, 4.5, &[0.5, 0.2, 0.3]).unwrap();

        assert_eq!(input.time, 4.5);
        assert_eq!(input.state, CompartmentState::new(0.5, 0.2, 0.3));
        assert_eq!(SirProblem.state(&input).unwrap(), [0.5, 0.2, 0.3]);
    }
}
