use std::ops::{Deref, DerefMut};

use serde_json::Value;

use super::{Emitter, Listener, Next};
use crate::config::EmitterConfig;

/// Capability trait for types that carry an [`Emitter`].
///
/// Implementors only provide [`emitter`](Emits::emitter); every emitter
/// operation is then available on the host itself, returning the host for
/// chaining. Implement it by hand, wrap a value in [`WithEmitter`], or use
/// `#[derive(Emits)]`.
///
/// ```
/// use serde_json::{json, Value};
/// use zeroin::{Emits, Emitter, Listener};
///
/// struct Room {
///     name: String,
///     events: Emitter,
/// }
///
/// impl Emits for Room {
///     type Value = Value;
///
///     fn emitter(&self) -> &Emitter {
///         &self.events
///     }
/// }
///
/// let room = Room { name: "lobby".into(), events: Emitter::new() };
/// room.on("joined", &Listener::new(|_args: &[Value]| {}));
/// assert!(room.emit("joined", &[json!("ana")]));
/// assert_eq!(room.name, "lobby");
/// ```
pub trait Emits {
    type Value: Clone + From<String> + Send + 'static;

    fn emitter(&self) -> &Emitter<Self::Value>;

    fn on(&self, topic: impl Into<String>, listener: &Listener<Self::Value>) -> &Self {
        self.emitter().on(topic, listener);
        self
    }

    fn once(&self, topic: impl Into<String>, listener: &Listener<Self::Value>) -> &Self {
        self.emitter().once(topic, listener);
        self
    }

    fn add_listener(&self, topic: impl Into<String>, listener: &Listener<Self::Value>) -> &Self {
        self.emitter().add_listener(topic, listener);
        self
    }

    fn prepend_listener(
        &self,
        topic: impl Into<String>,
        listener: &Listener<Self::Value>,
    ) -> &Self {
        self.emitter().prepend_listener(topic, listener);
        self
    }

    fn prepend_once_listener(
        &self,
        topic: impl Into<String>,
        listener: &Listener<Self::Value>,
    ) -> &Self {
        self.emitter().prepend_once_listener(topic, listener);
        self
    }

    fn on_next(&self, topic: impl Into<String>) -> Next<Self::Value> {
        self.emitter().on_next(topic)
    }

    fn once_next(&self, topic: impl Into<String>) -> Next<Self::Value> {
        self.emitter().once_next(topic)
    }

    fn off(&self, topic: &str, listener: &Listener<Self::Value>) -> &Self {
        self.emitter().off(topic, listener);
        self
    }

    fn off_topic(&self, topic: &str) -> &Self {
        self.emitter().off_topic(topic);
        self
    }

    fn off_all(&self) -> &Self {
        self.emitter().off_all();
        self
    }

    fn remove_listener(&self, topic: &str, listener: &Listener<Self::Value>) -> &Self {
        self.emitter().remove_listener(topic, listener);
        self
    }

    fn remove_all_listeners<'a>(&self, topic: impl Into<Option<&'a str>>) -> &Self {
        self.emitter().remove_all_listeners(topic);
        self
    }

    fn emit(&self, topic: &str, args: &[Self::Value]) -> bool {
        self.emitter().emit(topic, args)
    }

    fn event_names(&self) -> Vec<String> {
        self.emitter().event_names()
    }

    fn listeners<'a>(&self, topic: impl Into<Option<&'a str>>) -> Vec<Listener<Self::Value>> {
        self.emitter().listeners(topic)
    }

    fn listener_count(&self, topic: &str) -> usize {
        self.emitter().listener_count(topic)
    }

    fn get_max_listeners(&self) -> usize {
        self.emitter().get_max_listeners()
    }

    fn set_max_listeners(&self, max: usize) -> &Self {
        self.emitter().set_max_listeners(max);
        self
    }
}

/// Wraps an arbitrary value with a private emitter.
///
/// The host value is left untouched and stays reachable through `Deref`,
/// [`host`](Self::host) and [`host_mut`](Self::host_mut).
pub struct WithEmitter<T, V = Value> {
    host: T,
    emitter: Emitter<V>,
}

impl<T, V> WithEmitter<T, V>
where
    V: Clone + From<String> + Send + 'static,
{
    pub fn new(host: T) -> Self {
        Self {
            host,
            emitter: Emitter::new(),
        }
    }

    pub fn with_config(host: T, config: EmitterConfig) -> Self {
        Self {
            host,
            emitter: Emitter::with_config(config),
        }
    }

    pub fn host(&self) -> &T {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut T {
        &mut self.host
    }

    /// Drop the emitter (and all its listeners) and return the host.
    pub fn into_host(self) -> T {
        self.host
    }
}

impl<T, V> Emits for WithEmitter<T, V>
where
    V: Clone + From<String> + Send + 'static,
{
    type Value = V;

    fn emitter(&self) -> &Emitter<V> {
        &self.emitter
    }
}

impl<T, V> Deref for WithEmitter<T, V> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.host
    }
}

impl<T, V> DerefMut for WithEmitter<T, V> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.host
    }
}

/// Extension trait: `value.with_emitter()` for any value.
pub trait Emittable: Sized {
    fn with_emitter(self) -> WithEmitter<Self> {
        WithEmitter::new(self)
    }
}

impl<T> Emittable for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct Session {
        user: String,
    }

    #[test]
    fn wrapped_host_emits() {
        let session = Session {
            user: "ana".to_string(),
        }
        .with_emitter();

        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        session.on(
            "login",
            &Listener::new(move |args: &[Value]| {
                assert_eq!(args, &[json!("ana")]);
                flag.store(true, Ordering::SeqCst);
            }),
        );

        assert!(session.emit("login", &[json!(session.user.clone())]));
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn host_access() {
        let mut session = Session {
            user: "ana".to_string(),
        }
        .with_emitter();

        assert_eq!(session.host().user, "ana");
        session.host_mut().user = "bo".to_string();
        assert_eq!(session.user, "bo");

        let session = session.into_host();
        assert_eq!(session, Session { user: "bo".to_string() });
    }

    #[test]
    fn chaining_returns_host() {
        let session = WithEmitter::<_, Value>::with_config(
            Session {
                user: "ana".to_string(),
            },
            EmitterConfig::new().with_max_listeners(4),
        );
        let listener = Listener::new(|_args: &[Value]| {});

        let names = session
            .on("a", &listener)
            .once("b", &listener)
            .event_names();

        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(session.get_max_listeners(), 4);
    }
}
