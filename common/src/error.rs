use std::fmt::Display;

/// Error body returned by all HTTP endpoints.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorInformation {
    /// A short, machine readable, classification of the error
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl ErrorInformation {
    pub fn new(error: impl Into<String>, message: impl Into<String>, details: impl Display) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: details.to_string(),
        }
    }
}
