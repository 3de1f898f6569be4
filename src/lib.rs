//! In-process publish/subscribe.
//!
//! An [`Emitter`] maps topic names to ordered listener lists and calls them
//! synchronously on `emit`. Listeners can be one-shot, prepended, or
//! registered on the `*` wildcard topic to observe every emission. A
//! subscription without a callback ([`Emitter::on_next`]) returns a [`Next`]
//! future that resolves with the next emission's arguments.

mod config;
mod emitter;
mod error;

pub use config::EmitterConfig;
pub use emitter::{
    Emittable, Emits, Emitter, Listener, ListenerFn, Next, Payload, Placement, WithEmitter,
    WILDCARD,
};
pub use error::NextError;

#[cfg(feature = "derive")]
pub use zeroin_macros::Emits;

#[doc(hidden)]
pub mod __private {
    pub use crate::emitter::EmitterValue;
}
