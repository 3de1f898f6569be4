use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Closure type for event listeners.
pub type ListenerFn<V> = dyn Fn(&[V]) + Send + Sync;

/// A shareable handle to a listener callback.
///
/// Cloning a `Listener` yields another handle to the *same* callback, and two
/// handles compare equal only when they point at the same callback. This is
/// the identity used by [`Emitter::off`](crate::Emitter::off): keep a handle
/// around if you intend to remove the listener later.
///
/// ```
/// use zeroin::Listener;
/// use serde_json::Value;
///
/// let a: Listener = Listener::new(|_args: &[Value]| {});
/// let b = a.clone();
/// let c: Listener = Listener::new(|_args: &[Value]| {});
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub struct Listener<V = Value> {
    callback: Arc<ListenerFn<V>>,
}

impl<V> Listener<V> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[V]) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback directly, bypassing any emitter.
    pub fn call(&self, args: &[V]) {
        (self.callback)(args)
    }

    /// Identity comparison: `true` when both handles share one callback.
    pub fn same(&self, other: &Listener<V>) -> bool {
        // Compare data addresses only; vtable pointers for one type may differ
        // across codegen units.
        Arc::as_ptr(&self.callback) as *const () == Arc::as_ptr(&other.callback) as *const ()
    }
}

impl<V> Clone for Listener<V> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<V> PartialEq for Listener<V> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<V> Eq for Listener<V> {}

impl<V> fmt::Debug for Listener<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&(Arc::as_ptr(&self.callback) as *const ()))
            .finish()
    }
}
