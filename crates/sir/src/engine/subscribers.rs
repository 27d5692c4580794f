use std::fmt;

use contagion_core::Observer;
use log::debug;

use crate::{Parameters, Trajectory};

/// Published to every subscriber after each successful run.
#[derive(Debug, Clone, Copy)]
pub struct Publication<'a> {
    /// The parameters the trajectory was computed with.
    pub parameters: Parameters,

    /// The freshly computed trajectory, owned by the engine.
    pub trajectory: &'a Trajectory,
}

/// Actions a subscriber may request in response to a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop receiving publications.
    Unsubscribe,
}

/// Identifies a subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn for<'a> Observer<Publication<'a>, Action>>;

/// Subscribers in the order they were added.
#[derive(Default)]
pub(super) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber)>,
}

impl Subscribers {
    pub(super) fn add<O>(&mut self, observer: O) -> SubscriptionId
    where
        O: for<'a> Observer<Publication<'a>, Action> + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    pub(super) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Delivers a publication to every subscriber, dropping those that ask to
    /// unsubscribe.
    pub(super) fn publish(&mut self, publication: &Publication<'_>) {
        self.entries.retain_mut(|(id, subscriber)| {
            match subscriber.observe(publication) {
                Some(Action::Unsubscribe) => {
                    debug!("subscriber {id:?} unsubscribed");
                    false
                }
                None => true,
            }
        });
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("next_id", &self.next_id)
            .field("count", &self.entries.len())
            .finish()
    }
}
