use std::path::PathBuf;

/// Crate-wide error type.
///
/// The four categories carry different blast radii: `Decode` and `Backend`
/// are scoped to a single input file and the batch loop skips past them,
/// while `Configuration` and `Persistence` abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("audio decode failed: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("inference failed: {0}")]
    Backend(String),

    #[error("failed to persist batch record {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend(reason.into())
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// True when the error should skip the current file rather than abort
    /// the run.
    pub fn is_file_scoped(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
