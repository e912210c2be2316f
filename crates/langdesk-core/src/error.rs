use langdesk_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("validation error: {0}")]
    Validation(String),
}

impl SessionError {
    pub(crate) fn no_active_file() -> Self {
        Self::Validation("no file is open".into())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
