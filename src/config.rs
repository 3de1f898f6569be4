//! Emitter configuration.

use serde::{Deserialize, Serialize};

/// Construction-time settings for an [`Emitter`](crate::Emitter).
///
/// ```
/// use zeroin::EmitterConfig;
///
/// let config: EmitterConfig = serde_json::from_str(r#"{ "max_listeners": 5 }"#).unwrap();
/// assert_eq!(config.max_listeners, 5);
/// assert!(config.wildcard);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Advisory per-topic listener cap. `0` means unlimited. Going over the
    /// cap only logs a warning; registration still succeeds.
    pub max_listeners: usize,
    /// Whether listeners on `*` receive every emission.
    /// When disabled, `*` behaves like any other topic.
    pub wildcard: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: 0,
            wildcard: true,
        }
    }
}

impl EmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_listeners(mut self, max_listeners: usize) -> Self {
        self.max_listeners = max_listeners;
        self
    }

    pub fn with_wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard;
        self
    }
}
