use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use langdesk_core::SessionError;
use langdesk_store::StoreError;
use langdesk_vcs::VcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("confirmation required: {0} has unsaved changes")]
    ConfirmationRequired(String),

    #[error("another editor operation is in progress")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::ConfirmationRequired(_) | Self::Busy => StatusCode::CONFLICT,
            Self::Store(e) | Self::Vcs(VcsError::Path(e)) | Self::Session(SessionError::Store(e)) => {
                store_status(e)
            }
            Self::Vcs(VcsError::Validation(_)) | Self::Session(SessionError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Vcs(VcsError::Provider { .. }) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::AccessDenied(_) => StatusCode::FORBIDDEN,
        StoreError::Io { .. } | StoreError::InvalidRoot(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::ProjectNotFound("fr".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::Busy.status(), StatusCode::CONFLICT);
        assert_eq!(
            ServerError::ConfirmationRequired("a.txt".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(StoreError::AccessDenied("..".into())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::from(SessionError::Store(StoreError::NotFound("x".into()))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(VcsError::Validation("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(VcsError::provider("git add", "fatal")).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn io_store_errors_are_server_errors() {
        let err = StoreError::Io {
            path: "a.txt".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(ServerError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
