//! In-memory version control over an [`InMemoryFileStore`] working tree.
//!
//! [`InMemoryVcs`] keeps a HEAD snapshot and an index snapshot next to a
//! shared working tree store and implements the same stage / unstage /
//! discard / commit semantics as git, for tests and embedding.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use langdesk_store::{FileStore, InMemoryFileStore};

use crate::error::{VcsError, VcsResult};
use crate::status::ProjectStatus;
use crate::traits::{checked_file, checked_message, VcsProvider};

type Snapshot = BTreeMap<String, String>;

#[derive(Debug, Default)]
struct Repo {
    head: Snapshot,
    index: Snapshot,
    log: Vec<String>,
}

/// An in-memory implementation of [`VcsProvider`].
pub struct InMemoryVcs {
    worktree: Arc<InMemoryFileStore>,
    repo: Mutex<Repo>,
}

impl InMemoryVcs {
    /// Start with everything currently in `worktree` committed.
    pub fn new(worktree: Arc<InMemoryFileStore>) -> Self {
        let snapshot = worktree.snapshot();
        Self {
            worktree,
            repo: Mutex::new(Repo {
                head: snapshot.clone(),
                index: snapshot,
                log: Vec::new(),
            }),
        }
    }

    /// The shared working tree.
    pub fn worktree(&self) -> &Arc<InMemoryFileStore> {
        &self.worktree
    }

    /// Commit messages, oldest first.
    pub fn log(&self) -> Vec<String> {
        self.repo.lock().expect("lock poisoned").log.clone()
    }

    /// Content of `path` as recorded in HEAD.
    pub fn head_content(&self, path: &str) -> Option<String> {
        self.repo.lock().expect("lock poisoned").head.get(path).cloned()
    }

    fn unknown(command: &str, file: &str) -> VcsError {
        VcsError::provider(
            command,
            format!("pathspec '{file}' did not match any file(s) known to git"),
        )
    }
}

#[async_trait]
impl VcsProvider for InMemoryVcs {
    async fn stage(&self, file: &str) -> VcsResult<()> {
        let file = checked_file(file)?;
        let worktree = self.worktree.snapshot();
        let mut repo = self.repo.lock().expect("lock poisoned");
        match worktree.get(&file) {
            Some(content) => {
                repo.index.insert(file, content.clone());
            }
            None if repo.index.contains_key(&file) => {
                repo.index.remove(&file);
            }
            None => return Err(Self::unknown("git add", &file)),
        }
        Ok(())
    }

    async fn unstage(&self, file: &str) -> VcsResult<()> {
        let file = checked_file(file)?;
        let mut repo = self.repo.lock().expect("lock poisoned");
        match repo.head.get(&file).cloned() {
            Some(content) => {
                repo.index.insert(file, content);
            }
            None if repo.index.contains_key(&file) => {
                repo.index.remove(&file);
            }
            None => return Err(Self::unknown("git reset", &file)),
        }
        Ok(())
    }

    async fn discard(&self, file: &str) -> VcsResult<()> {
        let file = checked_file(file)?;
        let content = {
            let repo = self.repo.lock().expect("lock poisoned");
            repo.index
                .get(&file)
                .cloned()
                .ok_or_else(|| Self::unknown("git checkout", &file))?
        };
        self.worktree
            .write(&file, &content)
            .map_err(|e| VcsError::provider("git checkout", e.to_string()))
    }

    async fn commit(&self, message: &str) -> VcsResult<()> {
        let message = checked_message(message)?;
        let mut repo = self.repo.lock().expect("lock poisoned");
        if repo.index == repo.head {
            return Err(VcsError::provider("git commit", "nothing to commit"));
        }
        repo.head = repo.index.clone();
        repo.log.push(message.to_string());
        Ok(())
    }

    async fn status(&self) -> VcsResult<ProjectStatus> {
        let worktree = self.worktree.snapshot();
        let repo = self.repo.lock().expect("lock poisoned");
        let mut status = ProjectStatus::new();

        let tracked: BTreeSet<&String> = repo.head.keys().chain(repo.index.keys()).collect();
        for path in tracked {
            if repo.index.get(path) != repo.head.get(path) {
                status.staged.push(path.clone());
            }
        }
        for (path, content) in &repo.index {
            if worktree.get(path) != Some(content) {
                status.modified.push(path.clone());
            }
        }
        for path in worktree.keys() {
            if !repo.index.contains_key(path) {
                status.untracked.push(path.clone());
            }
        }

        Ok(status.sorted())
    }
}

impl std::fmt::Debug for InMemoryVcs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVcs")
            .field("worktree", &self.worktree)
            .finish()
    }
}
