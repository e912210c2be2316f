use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::path::{join_child, normalize_path};
use crate::traits::{sort_entries, DirEntry, EntryKind, FileStore};

/// Directory name never shown in listings.
const HIDDEN_DIR: &str = ".git";

/// Disk-backed file store rooted at a canonical project directory.
///
/// Paths are normalised lexically first, then the deepest existing ancestor
/// of the target is canonicalised so that symlinks leading out of the root
/// are rejected as well. Writes go through a temporary file in the target
/// directory and are renamed into place.
#[derive(Clone, Debug)]
pub struct FsFileStore {
    root: PathBuf,
}

impl FsFileStore {
    /// Open a store rooted at `root`, which must be an existing directory.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|_| StoreError::InvalidRoot(root.to_path_buf()))?;
        if !canonical.is_dir() {
            return Err(StoreError::InvalidRoot(root.to_path_buf()));
        }
        Ok(Self { root: canonical })
    }

    fn resolve(&self, raw: &str) -> StoreResult<(String, PathBuf)> {
        let rel = normalize_path(raw)?;
        let full = if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&rel)
        };
        self.guard(raw, &full)?;
        Ok((rel, full))
    }

    fn guard(&self, raw: &str, full: &Path) -> StoreResult<()> {
        let mut probe = full;
        loop {
            match probe.canonicalize() {
                Ok(real) if real.starts_with(&self.root) => return Ok(()),
                Ok(_) => return Err(StoreError::AccessDenied(raw.to_string())),
                Err(_) => match probe.parent() {
                    Some(parent) => probe = parent,
                    None => return Ok(()),
                },
            }
        }
    }
}

impl FileStore for FsFileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &str) -> StoreResult<String> {
        let (rel, full) = self.resolve(path)?;
        let content = fs::read_to_string(&full).map_err(|e| StoreError::from_io(&rel, e))?;
        debug!(path = %rel, bytes = content.len(), "read file");
        Ok(content)
    }

    fn write(&self, path: &str, content: &str) -> StoreResult<()> {
        let (rel, full) = self.resolve(path)?;
        if rel.is_empty() {
            return Err(StoreError::Io {
                path: rel,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "cannot write to the project root",
                ),
            });
        }

        let parent = full
            .parent()
            .ok_or_else(|| StoreError::AccessDenied(path.to_string()))?;
        if !parent.is_dir() {
            return Err(StoreError::NotFound(rel));
        }

        let io_err = |e: std::io::Error| StoreError::from_io(&rel, e);
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        if let Ok(meta) = fs::metadata(&full) {
            tmp.as_file().set_permissions(meta.permissions()).map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&full).map_err(|e| io_err(e.error))?;

        debug!(path = %rel, bytes = content.len(), "wrote file");
        Ok(())
    }

    fn list(&self, path: &str) -> StoreResult<Vec<DirEntry>> {
        let (rel, full) = self.resolve(path)?;
        let meta = fs::metadata(&full).map_err(|e| StoreError::from_io(&rel, e))?;
        if !meta.is_dir() {
            return Err(StoreError::NotFound(rel));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&full).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| StoreError::Io {
                path: rel.clone(),
                source: e.into(),
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == HIDDEN_DIR {
                continue;
            }
            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                path: join_child(&rel, &name),
                name,
                kind,
            });
        }

        sort_entries(&mut entries);
        debug!(path = %rel, count = entries.len(), "listed directory");
        Ok(entries)
    }
}
