use serde::Serialize;
use std::fmt;

/// Settlement state of the current attempt of a `RetryableDeferred`
///
/// `Fulfilled` is terminal. `Rejected` is not: the next observation starts
/// a new attempt and moves back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeferredState {
    /// An attempt is in flight
    Pending,

    /// An attempt succeeded; the value is shared with every observer
    Fulfilled,

    /// The latest attempt failed
    Rejected,
}

impl DeferredState {
    /// Whether no further attempt will ever be started
    pub fn is_terminal(self) -> bool {
        matches!(self, DeferredState::Fulfilled)
    }
}

impl fmt::Display for DeferredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeferredState::Pending => "pending",
            DeferredState::Fulfilled => "fulfilled",
            DeferredState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
