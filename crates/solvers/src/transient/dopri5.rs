//! Adaptive Dormand–Prince 5(4) solver for ODE problems.
//!
//! This module integrates an [`OdeProblem`] with the explicit embedded
//! Runge–Kutta pair of Dormand and Prince. Each step produces a fifth-order
//! solution (which is kept) and a fourth-order solution (used only to estimate
//! the local error). The step size adapts so that the RMS of the scaled error
//!
//! ```text
//! err_i / (abs_tol + rel_tol * max(|y_i|, |y_next_i|))
//! ```
//!
//! stays at or below one.
//!
//! Results are reported at caller-supplied sample times. Steps are shortened
//! to land exactly on each sample time, so every reported value is a solver
//! state rather than an interpolation.
//!
//! # Example
//!
//! ```ignore
//! use contagion_solvers::transient::dopri5;
//!
//! let times = [0.0, 0.5, 1.0];
//! let solution = dopri5::solve_unobserved(&model, &problem, initial, &times, &dopri5::Config::default())?;
//!
//! for snapshot in &solution.history {
//!     println!("{:?} -> {:?}", snapshot.input, snapshot.output);
//! }
//! ```

mod action;
mod config;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::{Error, TimesError};
pub use event::Event;
pub use solution::{Solution, Stats, Status};

use contagion_core::{Model, Observer, OdeProblem, Snapshot};
use log::{debug, trace};

// Dormand & Prince (1980) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights. The last stage is evaluated at the new state (FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth-order minus embedded fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Steps within this factor of the next sample time are stretched to land on it.
const LANDING_STRETCH: f64 = 1.01;

/// Integrates an ODE problem with the adaptive Dormand–Prince 5(4) method.
///
/// The first entry of `times` is the initial time; `initial` is the model
/// input at that time. The solution history holds one snapshot per sample
/// time reached, starting with the initial snapshot.
///
/// # Algorithm
///
/// 1. Call the model with the initial input and extract state and derivative.
/// 2. For each subsequent sample time, take adaptive steps until it is reached:
///    - Evaluate the six remaining stages, building each stage input with
///      [`OdeProblem::build_input`].
///    - Estimate the local error from the embedded fourth-order solution.
///    - Accept the step if the scaled error norm is at most one, otherwise
///      retry with a smaller step.
///    - Resize the step by `0.9 * err^(-1/5)`, limited to `[0.2, 5]`.
/// 3. At each sample time, record the snapshot and emit an [`Event`].
///
/// The whole computation is deterministic for fixed inputs and config.
///
/// # Observer
///
/// The observer receives an [`Event`] at each sample time (including the
/// initial one) and may return [`Action::StopEarly`] to end the integration.
///
/// # Errors
///
/// Returns an error if the sample times are invalid, if the model or problem
/// fails, if the state stops being finite, if the step size underflows, or if
/// the step budget in [`Config::max_steps`] is exhausted.
pub fn solve<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    initial: M::Input,
    times: &[f64],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
    Obs: Observer<Event<M::Input, M::Output>, Action>,
{
    error::check_times(times)?;

    let mut stats = Stats::default();
    let t0 = times[0];

    // Evaluate initial state.
    let initial_output = model.call(&initial).map_err(Error::model)?;
    stats.evaluations += 1;
    let mut state = problem.state(&initial).map_err(Error::problem)?;
    let mut slope = problem
        .derivative(&initial, &initial_output)
        .map_err(Error::problem)?;
    if !all_finite(&state) || !all_finite(&slope) {
        return Err(Error::NonFinite { time: t0 });
    }

    let initial_snapshot = Snapshot::new(initial.clone(), initial_output);
    let mut history = Vec::with_capacity(times.len());
    history.push(initial_snapshot.clone());

    // Emit initial event.
    let event = Event {
        sample: 0,
        time: t0,
        snapshot: initial_snapshot,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            history,
            stats,
        });
    }

    let system = System {
        model,
        problem,
        base: &initial,
    };

    let span = times[times.len() - 1] - t0;
    let mut step = config
        .initial_step()
        .unwrap_or_else(|| initial_step(&state, &slope, config))
        .min(span)
        .min(config.max_step());
    let mut time = t0;
    let mut attempts = 0;

    for (sample, &target) in times.iter().enumerate().skip(1) {
        loop {
            if attempts == config.max_steps() {
                return Err(Error::MaxSteps {
                    time,
                    steps: attempts,
                });
            }

            let remaining = target - time;
            let lands = step * LANDING_STRETCH >= remaining;
            let h = if lands { remaining } else { step };
            if !lands && h <= min_step(time, target) {
                return Err(Error::StepSizeUnderflow { time, step: h });
            }
            attempts += 1;

            let k1 = slope;
            let (_, k2) = system.eval(time + C2 * h, &combine(&state, h, &[(A21, &k1)]), &mut stats)?;
            let (_, k3) = system.eval(
                time + C3 * h,
                &combine(&state, h, &[(A31, &k1), (A32, &k2)]),
                &mut stats,
            )?;
            let (_, k4) = system.eval(
                time + C4 * h,
                &combine(&state, h, &[(A41, &k1), (A42, &k2), (A43, &k3)]),
                &mut stats,
            )?;
            let (_, k5) = system.eval(
                time + C5 * h,
                &combine(&state, h, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
                &mut stats,
            )?;
            let (_, k6) = system.eval(
                time + h,
                &combine(
                    &state,
                    h,
                    &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
                ),
                &mut stats,
            )?;

            let next_state = combine(
                &state,
                h,
                &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
            );
            let next_time = if lands { target } else { time + h };
            let (snapshot, k7) = system.eval(next_time, &next_state, &mut stats)?;

            let err = error_norm(&state, &next_state, h, [&k1, &k3, &k4, &k5, &k6, &k7], config);

            if err <= 1.0 && all_finite(&next_state) && all_finite(&k7) {
                stats.accepted += 1;
                time = next_time;
                state = next_state;
                slope = k7;

                // A step shortened to land on a sample says little about the
                // size the controller would choose, so never shrink because of it.
                let proposal = h * factor(err, MAX_FACTOR);
                step = if lands { step.max(proposal) } else { proposal }.min(config.max_step());

                if lands {
                    history.push(snapshot.clone());

                    let event = Event {
                        sample,
                        time,
                        snapshot,
                    };
                    if let Some(Action::StopEarly) = observer.observe(&event) {
                        debug!("dopri5 stopped by observer at t = {time}");
                        return Ok(Solution {
                            status: Status::StoppedByObserver,
                            history,
                            stats,
                        });
                    }
                    break;
                }
            } else {
                stats.rejected += 1;
                trace!("dopri5 rejected step {h:e} at t = {time} (error norm {err:e})");
                step = h * factor(err, 1.0);
            }
        }
    }

    debug!(
        "dopri5 reached t = {time}: {} accepted, {} rejected, {} model calls",
        stats.accepted, stats.rejected, stats.evaluations
    );

    Ok(Solution {
        status: Status::Complete,
        history,
        stats,
    })
}

/// Integrates an ODE problem with Dormand–Prince without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Returns the same errors as [`solve`].
pub fn solve_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    initial: M::Input,
    times: &[f64],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, initial, times, config, ())
}

/// Adapts a model and problem into `f(t, y)` for stage evaluation.
struct System<'a, M: Model, P> {
    model: &'a M,
    problem: &'a P,
    base: &'a M::Input,
}

impl<M: Model, P> System<'_, M, P> {
    fn eval<const N: usize>(
        &self,
        time: f64,
        state: &[f64; N],
        stats: &mut Stats,
    ) -> Result<(Snapshot<M::Input, M::Output>, [f64; N]), Error>
    where
        P: OdeProblem<N, Input = M::Input, Output = M::Output>,
    {
        let input = self
            .problem
            .build_input(self.base, time, state)
            .map_err(Error::problem)?;
        let output = self.model.call(&input).map_err(Error::model)?;
        stats.evaluations += 1;
        let derivative = self
            .problem
            .derivative(&input, &output)
            .map_err(Error::problem)?;
        Ok((Snapshot::new(input, output), derivative))
    }
}

/// Returns `state + h * Σ aᵢ kᵢ`.
fn combine<const N: usize>(state: &[f64; N], h: f64, terms: &[(f64, &[f64; N])]) -> [f64; N] {
    std::array::from_fn(|i| state[i] + h * terms.iter().map(|(a, k)| a * k[i]).sum::<f64>())
}

/// RMS of the local error estimate scaled by the mixed tolerance.
///
/// Returns NaN if any stage is not finite, which the caller treats as a rejection.
fn error_norm<const N: usize>(
    state: &[f64; N],
    next: &[f64; N],
    h: f64,
    [k1, k3, k4, k5, k6, k7]: [&[f64; N]; 6],
    config: &Config,
) -> f64 {
    if N == 0 {
        return 0.0;
    }
    let sum: f64 = (0..N)
        .map(|i| {
            let estimate =
                h * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
            let scale = config.abs_tol() + config.rel_tol() * state[i].abs().max(next[i].abs());
            (estimate / scale).powi(2)
        })
        .sum();
    (sum / N as f64).sqrt()
}

/// Step size multiplier for a given error norm, capped at `max`.
fn factor(err: f64, max: f64) -> f64 {
    if err.is_nan() {
        MIN_FACTOR
    } else if err == 0.0 {
        max
    } else {
        (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, max)
    }
}

/// First trial step from the ratio of state and derivative magnitudes.
fn initial_step<const N: usize>(state: &[f64; N], slope: &[f64; N], config: &Config) -> f64 {
    let (d0, d1) = state
        .iter()
        .zip(slope)
        .fold((0.0_f64, 0.0_f64), |(d0, d1), (y, dy)| {
            let scale = config.abs_tol() + config.rel_tol() * y.abs();
            (d0 + (y / scale).powi(2), d1 + (dy / scale).powi(2))
        });
    if d0 < 1e-10 || d1 < 1e-10 {
        1e-6
    } else {
        0.01 * (d0 / d1).sqrt()
    }
}

/// Smallest step that still moves `time` forward meaningfully.
fn min_step(time: f64, target: f64) -> f64 {
    16.0 * f64::EPSILON * time.abs().max(target.abs()).max(1.0)
}

fn all_finite<const N: usize>(values: &[f64; N]) -> bool {
    values.iter().all(|v| v.is_finite())
}
