use std::path::PathBuf;
use thiserror::Error;

/// Errors fatal to a single invocation. None of them leave a container behind:
/// they are all raised before the runtime is asked to start anything.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("{} is outside home directory {}", path.display(), home.display())]
    PathEscapesHome { path: PathBuf, home: PathBuf },

    #[error("writable path {entry:?} cannot be mounted: {source}")]
    WritablePathResolutionFailed {
        entry: String,
        #[source]
        source: Box<SandboxError>,
    },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("container runtime '{runtime}' is not available: {reason}")]
    RuntimeUnavailable { runtime: String, reason: String },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SandboxError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SandboxError> = std::result::Result<T, E>;
