use std::fmt;

/// Failure observed by a pending [`Next`](crate::Next) future.
///
/// Dispatch itself never fails: removing unknown listeners and emitting to
/// empty topics are no-ops. The only thing that can go wrong is waiting on an
/// emission that can no longer happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextError {
    /// The pending subscription was removed from the registry (or its
    /// emitter dropped) before any matching emission.
    Dropped { topic: String },
}

impl fmt::Display for NextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextError::Dropped { topic } => write!(
                f,
                "subscription to topic {:?} was dropped before any emission",
                topic
            ),
        }
    }
}

impl std::error::Error for NextError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_topic() {
        let err = NextError::Dropped {
            topic: "hello".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "subscription to topic \"hello\" was dropped before any emission"
        );
    }
}
