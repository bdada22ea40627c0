/// Error types for Tab Tidy
use thiserror::Error;

/// Failures surfaced by the core and its collaborators.
///
/// URL parse failures never surface here: they fall back to the
/// `"other"` label in [`crate::domain::extract_domain`].
#[derive(Error, Debug)]
pub enum TidyError {
    /// The tab API or the persistent store cannot be reached, e.g. when the
    /// popup is opened outside the extension.
    #[error("{0} is unavailable")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tab API error: {0}")]
    Tabs(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TidyError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TidyError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, TidyError>;
