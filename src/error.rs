//! Vitrine error types

use std::time::Duration;

/// Vitrine error types
#[derive(Debug, thiserror::Error)]
pub enum VitrineError {
    // Source/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    /// External source returned no usable payload (e.g. an empty result
    /// array from the LinkedIn proxy). Treated like a transport failure
    /// by the aggregator: the source degrades, nothing is cached.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Lookup errors
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    // Configuration errors
    #[error("no profile store configured")]
    NoProfileStore,

    #[error("configuration error: {0}")]
    Configuration(String),

    /// External translation call failed. Callers decide whether to
    /// surface this or degrade to the untranslated text — see
    /// [`translate_or_original`](crate::sources::TranslationClient::translate_or_original).
    #[error("translation failed: {0}")]
    TranslationFailed(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl VitrineError {
    /// Whether this error is a per-source failure the aggregator should
    /// absorb (degrade to an empty section) rather than propagate.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            VitrineError::Http(_)
                | VitrineError::Api { .. }
                | VitrineError::RateLimited { .. }
                | VitrineError::AuthenticationFailed
                | VitrineError::SourceUnavailable(_)
                | VitrineError::Json(_)
        )
    }
}

/// Result type alias for vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;
