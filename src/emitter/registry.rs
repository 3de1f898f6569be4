//! Topic registry: topic name -> ordered listener registrations.
//!
//! Topic keys are kept in first-population order and dropped as soon as their
//! last registration goes away, so the key list only ever names live topics.

use std::collections::hash_map;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::listener::Listener;
use super::next::Payload;

/// Sender half of a handler-less subscription, shared between the resolver
/// listener and its registration.
pub(crate) type PendingSender<V> = Arc<Mutex<Option<oneshot::Sender<Payload<V>>>>>;

/// Where a new registration lands in its topic's sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// After every existing listener (dispatched last).
    #[default]
    Append,
    /// Before every existing listener (dispatched first).
    Prepend,
}

/// One listener registered under one topic.
///
/// `live` is cleared exactly once, when the registration leaves the registry.
/// Dispatch snapshots hold their own `Arc`s, so they check it before calling.
///
/// A resolver registration also owns its future's sender slot. The slot is
/// emptied when the registration itself is dropped, not when the listener
/// handle is, so copies returned by `listeners()` cannot keep a `Next` pending.
pub(crate) struct Registration<V> {
    pub(crate) listener: Listener<V>,
    pub(crate) once: bool,
    live: AtomicBool,
    pending: Option<PendingSender<V>>,
}

impl<V> Registration<V> {
    pub(crate) fn new(listener: Listener<V>, once: bool) -> Arc<Self> {
        Arc::new(Self {
            listener,
            once,
            live: AtomicBool::new(true),
            pending: None,
        })
    }

    /// A once-registration that resolves the future behind `slot`.
    pub(crate) fn resolver(listener: Listener<V>, slot: PendingSender<V>) -> Arc<Self> {
        Arc::new(Self {
            listener,
            once: true,
            live: AtomicBool::new(true),
            pending: Some(slot),
        })
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Clear the live flag. Returns `true` only for the caller that cleared it.
    pub(crate) fn retire(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}

impl<V> Drop for Registration<V> {
    fn drop(&mut self) {
        // Closing the channel resolves a still-pending `Next` as dropped.
        if let Some(slot) = &self.pending {
            slot.lock().take();
        }
    }
}

pub(crate) type Snapshot<V> = Vec<Arc<Registration<V>>>;

pub(crate) struct Registry<V> {
    topics: HashMap<String, Vec<Arc<Registration<V>>>>,
    order: Vec<String>,
    warned: HashSet<String>,
}

impl<V> Registry<V> {
    pub(crate) fn new() -> Self {
        Self {
            topics: HashMap::new(),
            order: Vec::new(),
            warned: HashSet::new(),
        }
    }

    /// Insert `registration` under `topic` and return the topic's new length.
    pub(crate) fn insert(
        &mut self,
        topic: String,
        registration: Arc<Registration<V>>,
        placement: Placement,
    ) -> usize {
        let entries = match self.topics.entry(topic) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => {
                self.order.push(slot.key().clone());
                slot.insert(Vec::new())
            }
        };

        match placement {
            Placement::Append => entries.push(registration),
            Placement::Prepend => entries.insert(0, registration),
        }
        entries.len()
    }

    /// Record that the cap warning for `topic` was issued.
    /// Returns `false` if it already had been.
    pub(crate) fn mark_warned(&mut self, topic: &str) -> bool {
        if self.warned.contains(topic) {
            return false;
        }
        self.warned.insert(topic.to_string())
    }

    pub(crate) fn snapshot(&self, topic: &str) -> Snapshot<V> {
        self.topics.get(topic).cloned().unwrap_or_default()
    }

    /// Remove every registration of `listener` under `topic`.
    pub(crate) fn remove_listener(&mut self, topic: &str, listener: &Listener<V>) -> Snapshot<V> {
        let mut removed = Vec::new();
        if let Some(entries) = self.topics.get_mut(topic) {
            entries.retain(|registration| {
                if registration.listener.same(listener) {
                    registration.retire();
                    removed.push(Arc::clone(registration));
                    false
                } else {
                    true
                }
            });
        }
        self.prune(topic);
        removed
    }

    /// Remove one specific registration (matched by allocation, not listener).
    pub(crate) fn remove_registration(
        &mut self,
        topic: &str,
        registration: &Arc<Registration<V>>,
    ) -> Option<Arc<Registration<V>>> {
        let entries = self.topics.get_mut(topic)?;
        let index = entries.iter().position(|r| Arc::ptr_eq(r, registration))?;
        let removed = entries.remove(index);
        removed.retire();
        self.prune(topic);
        Some(removed)
    }

    pub(crate) fn clear_topic(&mut self, topic: &str) -> Snapshot<V> {
        let removed = self.topics.remove(topic).unwrap_or_default();
        for registration in &removed {
            registration.retire();
        }
        self.order.retain(|name| name != topic);
        self.warned.remove(topic);
        removed
    }

    pub(crate) fn clear(&mut self) -> Snapshot<V> {
        let mut removed = Vec::new();
        for topic in self.order.drain(..) {
            if let Some(entries) = self.topics.remove(&topic) {
                removed.extend(entries);
            }
        }
        for registration in &removed {
            registration.retire();
        }
        self.topics.clear();
        self.warned.clear();
        removed
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub(crate) fn listeners(&self, topic: &str) -> Vec<Listener<V>> {
        self.topics
            .get(topic)
            .map(|entries| entries.iter().map(|r| r.listener.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    fn prune(&mut self, topic: &str) {
        if self.topics.get(topic).is_some_and(Vec::is_empty) {
            self.topics.remove(topic);
            self.order.retain(|name| name != topic);
            self.warned.remove(topic);
        }
    }
}
