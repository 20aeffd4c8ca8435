use serde::{Deserialize, Serialize};

pub const LOAD_ERROR_TITLE: &str = "Failed to load application";

/// JSON body returned when the application could not be acquired.
///
/// Field order is part of the wire format: `error`, `message`, `stack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadErrorBody {
    pub error: String,
    pub message: String,
    pub stack: String,
}

impl LoadErrorBody {
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            error: LOAD_ERROR_TITLE.to_string(),
            message: message.into(),
            stack: stack.into(),
        }
    }
}
