use async_trait::async_trait;
use langdesk_store::normalize_path;

use crate::error::{VcsError, VcsResult};
use crate::status::ProjectStatus;

/// Version-control operations on one project's working tree.
///
/// File arguments are project-relative. Providers never observe or update
/// the editor's baselines: a discard here changes the file on disk, and an
/// open editor only learns about it on its next explicit load.
#[async_trait]
pub trait VcsProvider: Send + Sync {
    /// Add the working tree content of `file` to the index.
    async fn stage(&self, file: &str) -> VcsResult<()>;

    /// Reset the index entry of `file` to HEAD.
    async fn unstage(&self, file: &str) -> VcsResult<()>;

    /// Overwrite the working tree copy of `file` with its index content.
    async fn discard(&self, file: &str) -> VcsResult<()>;

    /// Record the index as a new commit.
    async fn commit(&self, message: &str) -> VcsResult<()>;

    /// Report staged, modified and untracked paths.
    async fn status(&self) -> VcsResult<ProjectStatus>;
}

/// Normalise a file argument, rejecting the project root itself.
pub fn checked_file(file: &str) -> VcsResult<String> {
    let path = normalize_path(file)?;
    if path.is_empty() {
        return Err(VcsError::Validation("file path must not be empty".into()));
    }
    Ok(path)
}

/// Trim a commit message, rejecting blank ones.
pub fn checked_message(message: &str) -> VcsResult<&str> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(VcsError::Validation("commit message must not be empty".into()));
    }
    Ok(trimmed)
}
