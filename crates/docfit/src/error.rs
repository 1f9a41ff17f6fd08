//! Typed errors for the generation boundary, the revision ladder, and
//! configuration loading.

use std::path::PathBuf;
use thiserror::Error;

use crate::api::classify::is_size_rejection;

/// Failure reported by a [`Generator`](crate::api::Generator).
///
/// Generators must report payload-too-large failures as
/// [`SizeRejected`](Self::SizeRejected); that is the only class the
/// [`Reviser`](crate::revise::Reviser) escalates on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("payload rejected as too large: {0}")]
    SizeRejected(String),

    #[error("generation failed: {0}")]
    Failed(String),
}

impl GenerationError {
    /// Classify a raw provider error message.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_size_rejection(&message) {
            Self::SizeRejected(message)
        } else {
            Self::Failed(message)
        }
    }

    pub fn is_size_rejection(&self) -> bool {
        matches!(self, Self::SizeRejected(_))
    }
}

/// Failure of a revision request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviseError {
    /// Size rejection persisted through the aggressive retry.
    #[error("document too large for processing. Original error: {original}")]
    TooLarge {
        /// Detail of the first (primary-tier) rejection.
        original: String,
        /// Detail of the aggressive-tier rejection.
        retry: String,
    },

    /// Any non-size generator failure, passed through without retry.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
