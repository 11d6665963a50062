use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Inbound body of an outline request.
#[derive(Debug, Deserialize, Validate)]
pub struct OutlineRequest {
    /// Free-text project description from the browser form.
    #[serde(rename = "userInput")]
    #[validate(custom(function = "not_blank"))]
    pub user_input: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// `{ "error": { "message": ... } }`, the body of every JSON failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}
