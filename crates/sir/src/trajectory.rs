use crate::{CompartmentState, TimeDomain};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Compartment values at every sample time of a simulation.
///
/// Each compartment is stored as its own column, aligned with
/// [`Trajectory::times`], which is the shape plotting layers consume.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Trajectory {
    times: TimeDomain,
    susceptible: Vec<f64>,
    infectious: Vec<f64>,
    removed: Vec<f64>,
}

/// The largest infectious fraction in a trajectory and when it occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub time: f64,
    pub value: f64,
}

impl Trajectory {
    /// Builds a trajectory from one state per sample time.
    pub(crate) fn from_states<I>(times: TimeDomain, states: I) -> Self
    where
        I: IntoIterator<Item = CompartmentState>,
    {
        let mut susceptible = Vec::with_capacity(times.len());
        let mut infectious = Vec::with_capacity(times.len());
        let mut removed = Vec::with_capacity(times.len());

        for state in states {
            susceptible.push(state.susceptible);
            infectious.push(state.infectious);
            removed.push(state.removed);
        }
        debug_assert_eq!(susceptible.len(), times.len());

        Self {
            times,
            susceptible,
            infectious,
            removed,
        }
    }

    /// Returns the sample times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        self.times.points()
    }

    /// Returns the time domain the trajectory was computed over.
    #[must_use]
    pub fn time_domain(&self) -> &TimeDomain {
        &self.times
    }

    #[must_use]
    pub fn susceptible(&self) -> &[f64] {
        &self.susceptible
    }

    #[must_use]
    pub fn infectious(&self) -> &[f64] {
        &self.infectious
    }

    #[must_use]
    pub fn removed(&self) -> &[f64] {
        &self.removed
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.susceptible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.susceptible.is_empty()
    }

    /// Returns the state at a sample index, or `None` if out of bounds.
    #[must_use]
    pub fn state_at(&self, index: usize) -> Option<CompartmentState> {
        Some(CompartmentState::new(
            *self.susceptible.get(index)?,
            self.infectious[index],
            self.removed[index],
        ))
    }

    /// Returns the state at the last sample time.
    #[must_use]
    pub fn final_state(&self) -> Option<CompartmentState> {
        self.len().checked_sub(1).and_then(|last| self.state_at(last))
    }

    /// Iterates over `(time, state)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, CompartmentState)> + '_ {
        self.times()
            .iter()
            .zip(&self.susceptible)
            .zip(&self.infectious)
            .zip(&self.removed)
            .map(|(((&t, &s), &i), &r)| (t, CompartmentState::new(s, i, r)))
    }

    /// Returns the first sample with the largest infectious fraction.
    #[must_use]
    pub fn peak_infectious(&self) -> Option<Peak> {
        let (index, &value) = self
            .infectious
            .iter()
            .enumerate()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })?;

        Some(Peak {
            index,
            time: self.times()[index],
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        let times = TimeDomain::new(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let states = [
            [0.9, 0.1, 0.0],
            [0.8, 0.15, 0.05],
            [0.7, 0.15, 0.15],
            [0.65, 0.1, 0.25],
        ];
        Trajectory::from_states(times, states.map(CompartmentState::from))
    }

    #[test]
    fn columns_align_with_times() {
        let trajectory = sample();
        assert_eq!(trajectory.len(), 4);
        assert_eq!(trajectory.times(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(trajectory.susceptible(), &[0.9, 0.8, 0.7, 0.65]);
        assert_eq!(trajectory.infectious(), &[0.1, 0.15, 0.15, 0.1]);
        assert_eq!(trajectory.removed(), &[0.0, 0.05, 0.15, 0.25]);
    }

    #[test]
    fn state_lookup() {
        let trajectory = sample();
        assert_eq!(
            trajectory.state_at(1),
            Some(CompartmentState::new(0.8, 0.15, 0.05))
        );
        assert_eq!(trajectory.state_at(4), None);
        assert_eq!(
            trajectory.final_state(),
            Some(CompartmentState::new(0.65, 0.1, 0.25))
        );
    }

    #[test]
    fn iterates_in_time_order() {
        let times: Vec<f64> = sample().iter().map(|(t, _)| t).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0]);

        let (t, state) = sample().iter().nth(2).unwrap();
        assert_eq!(t, 2.0);
        assert_eq!(state, CompartmentState::new(0.7, 0.15, 0.15));
    }

    #[test]
    fn peak_reports_first_maximum() {
        assert_eq!(
            sample().peak_infectious(),
            Some(Peak {
                index: 1,
                time: 1.0,
                value: 0.15
            })
        );
    }
}
