//! Rooted file storage for langdesk.
//!
//! Every project the dashboard manages is a directory on disk. This crate
//! reads, writes and lists text files under such a root and guarantees that
//! no path argument can reach outside it.
//!
//! # Backends
//!
//! All backends implement the [`FileStore`] trait:
//!
//! - [`FsFileStore`] -- disk-backed, atomic writes, symlink-aware guard
//! - [`InMemoryFileStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Paths
//!
//! Paths are project-relative and canonicalised by [`normalize_path`]:
//! forward slashes, no `.`/`..` components, never absolute.

pub mod error;
pub mod fs;
pub mod memory;
pub mod path;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsFileStore;
pub use memory::InMemoryFileStore;
pub use path::{file_name, join_child, normalize_path};
pub use traits::{DirEntry, EntryKind, FileStore};
