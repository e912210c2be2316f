use std::path::PathBuf;

/// Errors from file store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested path does not exist under the project root.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path resolves outside the project root.
    #[error("access denied: {0} escapes the project root")]
    AccessDenied(String),

    /// Reading or writing the underlying file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured project root is missing or is not a directory.
    #[error("invalid project root {0:?}")]
    InvalidRoot(PathBuf),
}

impl StoreError {
    /// Map an I/O error on `path`, folding `NotFound` into [`StoreError::NotFound`].
    pub fn from_io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_string())
        } else {
            Self::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
