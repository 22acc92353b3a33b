use thiserror::Error;

pub use shared::AuthError;

/// Shown when an error has nothing printable to say.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error.";

/// Invalid construction input. Fatal: no widget is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Element required")]
    MissingElement,
    #[error("Expected element to be a DOM node")]
    NotANode,
    #[error("Duplicate form group input name: {0}")]
    DuplicateInputName(String),
    #[error("Invalid widget options: {0}")]
    InvalidOptions(String),
}

/// A field rejected by its validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{input_name}: {message}")]
pub struct ValidationError {
    pub input_name: String,
    pub message: String,
}

/// Text suitable for the notification slot, never empty.
pub fn display_message(error: &impl std::fmt::Display) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
