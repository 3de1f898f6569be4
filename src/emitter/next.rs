//! Handler-less subscriptions.
//!
//! `Emitter::on_next` / `Emitter::once_next` register an ordinary one-shot
//! listener whose only job is to complete a oneshot channel. The returned
//! [`Next`] is therefore already resolved by the time `emit` returns; awaiting
//! it never requires a particular runtime.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::NextError;

/// Arguments captured from one emission.
///
/// Exactly one emitted argument resolves as `Single`; zero or several resolve
/// as `Many`. Serializes the same way: a bare value or an array.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload<V = Value> {
    Single(V),
    Many(Vec<V>),
}

impl<V: Clone> Payload<V> {
    pub(crate) fn from_args(args: &[V]) -> Self {
        match args {
            [only] => Payload::Single(only.clone()),
            _ => Payload::Many(args.to_vec()),
        }
    }
}

impl<V> Payload<V> {
    /// Flatten back into the emitted argument list.
    pub fn into_vec(self) -> Vec<V> {
        match self {
            Payload::Single(value) => vec![value],
            Payload::Many(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Single(_) => 1,
            Payload::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Future for the next emission of a topic.
///
/// Resolves with the emitted [`Payload`], or with [`NextError::Dropped`] if
/// the pending registration is removed (for example by `off_topic`) or the
/// emitter is dropped first.
#[derive(Debug)]
#[must_use = "a Next does nothing unless awaited or checked"]
pub struct Next<V = Value> {
    topic: String,
    receiver: oneshot::Receiver<Payload<V>>,
}

impl<V> Next<V> {
    pub(crate) fn new(topic: String, receiver: oneshot::Receiver<Payload<V>>) -> Self {
        Self { topic, receiver }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Check for a resolution without waiting.
    ///
    /// Returns `Ok(None)` while no matching emission has happened yet. Once a
    /// payload has been taken, later calls report `Dropped`.
    pub fn try_resolve(&mut self) -> Result<Option<Payload<V>>, NextError> {
        match self.receiver.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(self.dropped()),
        }
    }

    fn dropped(&self) -> NextError {
        NextError::Dropped {
            topic: self.topic.clone(),
        }
    }
}

impl<V> Unpin for Next<V> {}

impl<V> Future for Next<V> {
    type Output = Result<Payload<V>, NextError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(payload)) => Poll::Ready(Ok(payload)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(this.dropped())),
            Poll::Pending => Poll::Pending,
        }
    }
}
