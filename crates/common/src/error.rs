//! Error types shared across Slidetrack crates.

use std::path::PathBuf;

/// Boxed cause kept behind a categorized error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for Slidetrack operations.
///
/// Crate-local errors (`DecodeError`, `MatchError`, `RequestError`) convert
/// into this type at crate boundaries so callers can map every failure to a
/// single client-visible status. The original error stays reachable through
/// `source()`.
#[derive(Debug, thiserror::Error)]
pub enum SlidetrackError {
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Dimension error: {message}")]
    Dimension {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Match error: {message}")]
    Match {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Invalid request: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SlidetrackError.
pub type SlidetrackResult<T> = Result<T, SlidetrackError>;

impl SlidetrackError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
            source: None,
        }
    }

    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension {
            message: msg.into(),
            source: None,
        }
    }

    pub fn matching(msg: impl Into<String>) -> Self {
        Self::Match {
            message: msg.into(),
            source: None,
        }
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request {
            message: msg.into(),
            source: None,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Decode failure wrapping the crate-local error.
    pub fn decode_from<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Dimension failure wrapping the crate-local error.
    pub fn dimension_from<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Dimension {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Match failure wrapping the crate-local error.
    pub fn matching_from<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Match {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Request failure wrapping the crate-local error.
    pub fn request_from<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Request {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// The wrapped crate-local error, if it is an `E`.
    pub fn cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        std::error::Error::source(self).and_then(|source| source.downcast_ref::<E>())
    }

    /// Status indicator a transport boundary should report for this error.
    ///
    /// Failures caused by the client's input map to 400, everything else
    /// to 500. `Json` only comes from reading local files, so it counts as
    /// internal.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Decode { .. }
            | Self::Dimension { .. }
            | Self::Match { .. }
            | Self::Request { .. } => 400,
            Self::FileNotFound { .. } => 404,
            Self::Config { .. } | Self::Io(_) | Self::Json(_) | Self::Other(_) => 500,
        }
    }
}
