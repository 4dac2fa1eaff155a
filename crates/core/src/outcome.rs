// crates/core/src/outcome.rs
use serde::{Deserialize, Serialize};

/// Result of one dispatched query. `error == false` means `message` is the
/// final spoken/displayed answer; `error == true` means it is a user-facing
/// failure explanation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub error: bool,
    pub message: String,
}

impl QueryOutcome {
    pub fn answer(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}
