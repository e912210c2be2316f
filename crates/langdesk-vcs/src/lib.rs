//! Version-control provider for langdesk.
//!
//! The dashboard never links a git library: it drives the `git` executable
//! and parses its machine-readable output. The [`VcsProvider`] trait is the
//! seam; the editor core does not depend on it at all, which keeps the
//! provider and the editor's baselines independent observers of a file.
//!
//! # Key Types
//!
//! - [`VcsProvider`] -- stage / unstage / discard / commit / status
//! - [`GitProvider`] -- shells out to `git`
//! - [`InMemoryVcs`] -- HEAD + index snapshots over an in-memory worktree
//! - [`ProjectStatus`] -- staged, modified and untracked paths
//! - [`open_in_editor`] -- launch an external editor on a project root

pub mod editor;
pub mod error;
pub mod git;
pub mod memory;
pub mod porcelain;
pub mod status;
pub mod traits;

pub use editor::open_in_editor;
pub use error::{VcsError, VcsResult};
pub use git::GitProvider;
pub use memory::InMemoryVcs;
pub use porcelain::parse_porcelain_z;
pub use status::ProjectStatus;
pub use traits::{checked_file, checked_message, VcsProvider};
