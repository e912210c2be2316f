use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// The final path component.
    pub name: String,
    /// Normalised path relative to the project root.
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: path.into(), kind: EntryKind::File }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: path.into(), kind: EntryKind::Directory }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Text file storage rooted at a project directory.
///
/// All implementations must satisfy these invariants:
/// - Every path argument is project-relative and is normalised with
///   [`normalize_path`](crate::normalize_path) before use.
/// - A path that resolves outside the root fails with `AccessDenied`,
///   never touches storage.
/// - A failed `write` leaves the previous content in place.
pub trait FileStore: Send + Sync {
    /// The directory every path is resolved against.
    fn root(&self) -> &Path;

    /// Read the full text content at `path`.
    fn read(&self, path: &str) -> StoreResult<String>;

    /// Replace the content at `path`.
    fn write(&self, path: &str, content: &str) -> StoreResult<()>;

    /// List the immediate children of the directory at `path`.
    ///
    /// Directories come first, then files, each group sorted by name.
    fn list(&self, path: &str) -> StoreResult<Vec<DirEntry>>;
}

/// Sort entries directories-first, then by name.
pub(crate) fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name)));
}
