use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::path::{join_child, normalize_path};
use crate::traits::{sort_entries, DirEntry, FileStore};

/// In-memory, `BTreeMap`-based file store.
///
/// Intended for tests and embedding. Directories are implied by file paths.
/// Reads and writes can be made to fail on demand to exercise error paths.
pub struct InMemoryFileStore {
    root: PathBuf,
    files: RwLock<BTreeMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryFileStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("memory"),
            files: RwLock::new(BTreeMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Create a store pre-populated with `(path, content)` pairs.
    ///
    /// Fails with [`StoreError::AccessDenied`] if a seed path escapes the root.
    pub fn with_files<'a>(
        files: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> StoreResult<Self> {
        let store = Self::new();
        {
            let mut map = store.files.write().expect("lock poisoned");
            for (path, content) in files {
                map.insert(normalize_path(path)?, content.to_string());
            }
        }
        Ok(store)
    }

    /// Make every subsequent read fail with an I/O error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Remove a file. Returns `true` if it existed.
    pub fn remove(&self, path: &str) -> StoreResult<bool> {
        let path = normalize_path(path)?;
        Ok(self.files.write().expect("lock poisoned").remove(&path).is_some())
    }

    /// Copy of every stored file, keyed by normalised path.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.files.read().expect("lock poisoned").clone()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }

    fn injected(path: &str, op: &str) -> StoreError {
        StoreError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, format!("injected {op} failure")),
        }
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for InMemoryFileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        let path = normalize_path(path)?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected(&path, "read"));
        }
        self.files
            .read()
            .expect("lock poisoned")
            .get(&path)
            .cloned()
            .ok_or(StoreError::NotFound(path))
    }

    fn write(&self, path: &str, content: &str) -> StoreResult<()> {
        let path = normalize_path(path)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected(&path, "write"));
        }
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path, content.to_string());
        Ok(())
    }

    fn list(&self, path: &str) -> StoreResult<Vec<DirEntry>> {
        let dir = normalize_path(path)?;
        let files = self.files.read().expect("lock poisoned");
        let prefix = if dir.is_empty() { String::new() } else { format!("{dir}/") };

        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        let mut found = dir.is_empty();
        for key in files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else { continue };
            found = true;
            match rest.split_once('/') {
                Some((child, _)) => {
                    dirs.insert(child.to_string());
                }
                None => entries.push(DirEntry::file(rest, key.clone())),
            }
        }
        if !found {
            return Err(StoreError::NotFound(dir));
        }

        entries.extend(
            dirs.into_iter()
                .map(|name| DirEntry::directory(name.clone(), join_child(&dir, &name))),
        );
        sort_entries(&mut entries);
        Ok(entries)
    }
}

impl std::fmt::Debug for InMemoryFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFileStore")
            .field("file_count", &self.len())
            .finish()
    }
}
