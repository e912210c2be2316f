//! Error types for the version-control crate.

use langdesk_store::StoreError;

/// Errors returned by a [`VcsProvider`](crate::VcsProvider).
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// The underlying version-control command failed.
    #[error("`{command}` failed: {diagnostic}")]
    Provider {
        /// The command line that was run.
        command: String,
        /// The tool's own diagnostic output.
        diagnostic: String,
    },

    /// The request was rejected before reaching the tool.
    #[error("validation error: {0}")]
    Validation(String),

    /// A file argument failed path normalisation.
    #[error("invalid path: {0}")]
    Path(#[from] StoreError),
}

impl VcsError {
    pub fn provider(command: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::Provider {
            command: command.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

/// Convenience alias for provider results.
pub type VcsResult<T> = Result<T, VcsError>;
