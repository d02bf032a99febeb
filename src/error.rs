//! Error kinds for the resolution pipeline.
//!
//! Every failure in any component propagates unmodified to the result
//! emitter, which is the single point converting it into the structured
//! failure document. Nothing is swallowed or retried internally.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input is missing or empty.
    #[error("missing required input: {0}")]
    Input(String),

    /// A scheme, target, build configuration or project file is absent.
    #[error("{0}")]
    NotFound(String),

    /// More than one candidate file matched a lookup by name.
    #[error("{0}")]
    AmbiguousResult(String),

    /// The target-dependency graph could not be resolved.
    #[error("{0}")]
    Graph(String),

    /// A failure reported by the developer-portal collaborator; carries the
    /// provider-preferred message when one is available.
    #[error("{message}")]
    Remote { message: String },

    /// A transient remote condition the caller should retry.
    #[error("{message}")]
    Retryable { message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Project(#[from] signscout_xcodeproj::ProjectError),

    #[error(transparent)]
    Profile(#[from] signscout_profile::ProfileError),
}

impl Error {
    /// Whether the caller should re-invoke instead of treating this as final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Retryable { .. })
    }

    /// Process exit code for this failure. Retryable failures exit 0; the
    /// caller inspects the `retry` flag in the output document.
    pub fn exit_code(&self) -> i32 {
        if self.is_retryable() {
            0
        } else {
            1
        }
    }

    /// The failure message followed by the error-source chain, one frame
    /// per line.
    pub fn trace(&self) -> String {
        let mut lines = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        lines.join("\n")
    }
}
