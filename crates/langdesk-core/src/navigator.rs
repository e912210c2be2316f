use std::sync::Arc;

use langdesk_store::{DirEntry, FileStore};

use crate::confirm::SaveConfirmation;
use crate::error::SessionResult;
use crate::session::{EditorSession, SessionState};

/// Browses a project's files and hands selections to an [`EditorSession`].
#[derive(Clone)]
pub struct Navigator {
    store: Arc<dyn FileStore>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("root", &self.store.root())
            .finish()
    }
}

impl Navigator {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// One level of the tree under `path`: directories first, then files.
    pub fn list_children(&self, path: &str) -> SessionResult<Vec<DirEntry>> {
        Ok(self.store.list(path)?)
    }

    /// Open a file selected in the tree.
    pub fn open(
        &self,
        session: &mut EditorSession,
        path: &str,
        confirm: impl SaveConfirmation,
    ) -> SessionResult<SessionState> {
        session.load(path, confirm)
    }
}
