//! Error types for the synchronization core.

/// Main error type for synchronization operations.
///
/// Remote failures surface to the presentation boundary as a single alert;
/// store failures are absorbed by the cache layer and never shown. A stale
/// lesson reference is not an error at all (selection is a silent no-op).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Topic not found in knowledge graph: {0}")]
    UnknownTopic(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl SyncError {
    /// Whether this error is reported through the presentation boundary.
    ///
    /// Store errors are absorbed where they occur; everything else reaches
    /// `display_error`.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Store(_) => false,
            Self::UnknownTopic(_) | Self::Network(_) => true,
        }
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("JSON error: {}", err))
    }
}

/// Result type alias for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
