//! Topic-keyed event emitter.
//!
//! # Dispatch model
//!
//! `emit` runs every listener synchronously on the caller's stack:
//!
//! ```text
//!  emit("hello", args)
//!    │
//!    ├─ lock ─► snapshot("hello") + snapshot("*") ─► unlock
//!    │
//!    ├─► "hello" listeners, in order, with args
//!    │     (once-listeners are unregistered before they run)
//!    │
//!    └─► "*" listeners, in order, with ["hello", args...]
//! ```
//!
//! - A listener added during a pass is not called until the next emit.
//! - A listener removed during a pass is skipped if it has not run yet.
//! - A panicking listener is not caught. The panic reaches the `emit` caller
//!   and the rest of that pass (wildcard listeners included) does not run.
//!
//! The registry lock is never held while a listener runs, so listeners may
//! call back into the emitter (subscribe, unsubscribe, emit) freely.

mod host_ext;
mod listener;
mod next;
mod registry;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::EmitterConfig;
use registry::{PendingSender, Registration, Registry, Snapshot};

pub use host_ext::{Emittable, Emits, WithEmitter};
pub use listener::{Listener, ListenerFn};
pub use next::{Next, Payload};
pub use registry::Placement;

/// The reserved topic whose listeners receive every emission.
pub const WILDCARD: &str = "*";

/// Synchronous publish/subscribe dispatcher.
///
/// `V` is the argument type handed to listeners. Wildcard listeners receive
/// the topic name as their first argument, converted with `V::from(String)`.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use serde_json::{json, Value};
/// use zeroin::{Emitter, Listener};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let log = Arc::clone(&seen);
///
/// let emitter: Emitter = Emitter::new();
/// emitter.on("hello", &Listener::new(move |args: &[Value]| {
///     log.lock().unwrap().extend_from_slice(args);
/// }));
///
/// assert!(emitter.emit("hello", &[json!("world")]));
/// assert!(!emitter.emit("nobody-listens", &[]));
/// assert_eq!(*seen.lock().unwrap(), vec![json!("world")]);
/// ```
pub struct Emitter<V = Value> {
    registry: Mutex<Registry<V>>,
    max_listeners: AtomicUsize,
    wildcard: bool,
}

impl<V> Emitter<V>
where
    V: Clone + From<String> + Send + 'static,
{
    /// An emitter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// An emitter using `config`'s listener cap and wildcard setting.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            max_listeners: AtomicUsize::new(config.max_listeners),
            wildcard: config.wildcard,
        }
    }

    // ------------------------------------------------------------------
    // Subscription
    // ------------------------------------------------------------------

    /// Register `listener` under `topic`, after any existing listeners.
    pub fn on(&self, topic: impl Into<String>, listener: &Listener<V>) -> &Self {
        self.subscribe(topic.into(), listener.clone(), false, Placement::Append)
    }

    /// Register `listener` under `topic` for a single invocation.
    pub fn once(&self, topic: impl Into<String>, listener: &Listener<V>) -> &Self {
        self.subscribe(topic.into(), listener.clone(), true, Placement::Append)
    }

    /// Alias of [`on`](Self::on).
    pub fn add_listener(&self, topic: impl Into<String>, listener: &Listener<V>) -> &Self {
        self.on(topic, listener)
    }

    /// Like [`on`](Self::on), but the listener runs before existing ones.
    pub fn prepend_listener(&self, topic: impl Into<String>, listener: &Listener<V>) -> &Self {
        self.subscribe(topic.into(), listener.clone(), false, Placement::Prepend)
    }

    /// Like [`once`](Self::once), but the listener runs before existing ones.
    pub fn prepend_once_listener(
        &self,
        topic: impl Into<String>,
        listener: &Listener<V>,
    ) -> &Self {
        self.subscribe(topic.into(), listener.clone(), true, Placement::Prepend)
    }

    /// Subscribe without a callback: the returned future resolves with the
    /// arguments of the next emission of `topic`.
    pub fn on_next(&self, topic: impl Into<String>) -> Next<V> {
        self.next(topic, Placement::Append)
    }

    /// Same as [`on_next`](Self::on_next); a future only ever resolves once.
    pub fn once_next(&self, topic: impl Into<String>) -> Next<V> {
        self.next(topic, Placement::Append)
    }

    /// Handler-less subscription with explicit placement.
    pub fn next(&self, topic: impl Into<String>, placement: Placement) -> Next<V> {
        let topic = topic.into();
        let (tx, rx) = oneshot::channel();
        let slot: PendingSender<V> = Arc::new(Mutex::new(Some(tx)));
        let sender = Arc::clone(&slot);
        let resolver = Listener::new(move |args: &[V]| {
            if let Some(tx) = sender.lock().take() {
                // The caller may have dropped the future; nothing to deliver to.
                let _ = tx.send(Payload::from_args(args));
            }
        });
        self.register(topic.clone(), Registration::resolver(resolver, slot), placement);
        Next::new(topic, rx)
    }

    fn subscribe(
        &self,
        topic: String,
        listener: Listener<V>,
        once: bool,
        placement: Placement,
    ) -> &Self {
        self.register(topic, Registration::new(listener, once), placement)
    }

    fn register(
        &self,
        topic: String,
        registration: Arc<Registration<V>>,
        placement: Placement,
    ) -> &Self {
        let max = self.max_listeners.load(Ordering::Relaxed);
        let (count, should_warn) = {
            let mut registry = self.registry.lock();
            let count = registry.insert(topic.clone(), registration, placement);
            (count, max > 0 && count > max && registry.mark_warned(&topic))
        };

        // Logged after unlocking: a logger may call back into this emitter.
        if should_warn {
            warn!(
                "possible listener leak: {} listeners registered for topic {:?} (max {}); \
                 use set_max_listeners() to raise the limit",
                count, topic, max
            );
        }
        self
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove `listener` from `topic`. Unknown topics or listeners are ignored.
    pub fn off(&self, topic: &str, listener: &Listener<V>) -> &Self {
        let removed = self.registry.lock().remove_listener(topic, listener);
        drop(removed);
        self
    }

    /// Remove every listener registered under `topic`.
    pub fn off_topic(&self, topic: &str) -> &Self {
        let removed = self.registry.lock().clear_topic(topic);
        if !removed.is_empty() {
            debug!("cleared {} listener(s) from topic {:?}", removed.len(), topic);
        }
        self
    }

    /// Remove every listener from every topic.
    pub fn off_all(&self) -> &Self {
        let removed = self.registry.lock().clear();
        if !removed.is_empty() {
            debug!("cleared {} listener(s) from all topics", removed.len());
        }
        self
    }

    /// Alias of [`off`](Self::off).
    pub fn remove_listener(&self, topic: &str, listener: &Listener<V>) -> &Self {
        self.off(topic, listener)
    }

    /// With a topic, clears that topic; with `None`, clears everything.
    pub fn remove_all_listeners<'a>(&self, topic: impl Into<Option<&'a str>>) -> &Self {
        match topic.into() {
            Some(topic) => self.off_topic(topic),
            None => self.off_all(),
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Call every listener of `topic`, then every wildcard listener.
    ///
    /// Returns `true` if at least one listener ran.
    pub fn emit(&self, topic: &str, args: &[V]) -> bool {
        let fan_out = self.wildcard && topic != WILDCARD;
        let (direct, wildcard) = {
            let registry = self.registry.lock();
            let wildcard = if fan_out {
                registry.snapshot(WILDCARD)
            } else {
                Snapshot::new()
            };
            (registry.snapshot(topic), wildcard)
        };

        if direct.is_empty() && wildcard.is_empty() {
            return false;
        }

        let mut invoked = false;
        for registration in &direct {
            invoked |= self.dispatch(topic, registration, args);
        }

        if !wildcard.is_empty() {
            let mut tagged = Vec::with_capacity(args.len() + 1);
            tagged.push(V::from(topic.to_string()));
            tagged.extend_from_slice(args);
            for registration in &wildcard {
                invoked |= self.dispatch(WILDCARD, registration, &tagged);
            }
        }

        invoked
    }

    fn dispatch(&self, topic: &str, registration: &Arc<Registration<V>>, args: &[V]) -> bool {
        if registration.once {
            // Whoever clears the flag owns the single invocation, which keeps
            // nested emits from firing it a second time.
            if !registration.retire() {
                return false;
            }
            let removed = self.registry.lock().remove_registration(topic, registration);
            drop(removed);
        } else if !registration.is_live() {
            return false;
        }

        registration.listener.call(args);
        true
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Topics with at least one listener, in the order they were first used.
    pub fn event_names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    /// A copy of the listeners for `topic`, in dispatch order.
    ///
    /// Passing `None` yields an empty list; listeners are never aggregated
    /// across topics.
    pub fn listeners<'a>(&self, topic: impl Into<Option<&'a str>>) -> Vec<Listener<V>> {
        match topic.into() {
            Some(topic) => self.registry.lock().listeners(topic),
            None => Vec::new(),
        }
    }

    /// Number of listeners registered under `topic`.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.registry.lock().count(topic)
    }

    /// The advisory per-topic cap; `0` means unlimited.
    pub fn get_max_listeners(&self) -> usize {
        self.max_listeners.load(Ordering::Relaxed)
    }

    /// Set the advisory per-topic cap (`0` = unlimited). Exceeding it only
    /// logs a warning, once per topic.
    pub fn set_max_listeners(&self, max: usize) -> &Self {
        self.max_listeners.store(max, Ordering::Relaxed);
        self
    }

    pub fn wildcard_enabled(&self) -> bool {
        self.wildcard
    }
}

impl<V> Default for Emitter<V>
where
    V: Clone + From<String> + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Emitter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("event_names", &self.registry.lock().names())
            .field("max_listeners", &self.max_listeners.load(Ordering::Relaxed))
            .field("wildcard", &self.wildcard)
            .finish()
    }
}

#[doc(hidden)]
pub trait EmitterValue {
    type Value;
}

impl<V> EmitterValue for Emitter<V> {
    type Value = V;
}
