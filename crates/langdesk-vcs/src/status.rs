//! Working tree status as reported by a provider.

use serde::{Deserialize, Serialize};

/// Status of one project's working tree, in project-relative paths.
///
/// A path may appear in both `staged` and `modified` (staged, then edited
/// again in the working tree).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    /// Paths whose index entry differs from HEAD.
    pub staged: Vec<String>,
    /// Tracked paths whose working tree content differs from the index.
    pub modified: Vec<String>,
    /// Paths present in the working tree but unknown to the index.
    pub untracked: Vec<String>,
}

impl ProjectStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes of any kind.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }

    /// Returns `true` if there is anything to commit.
    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn is_staged(&self, path: &str) -> bool {
        self.staged.iter().any(|p| p == path)
    }

    /// Unstaged work: modified and untracked paths, sorted and deduplicated.
    pub fn working(&self) -> Vec<String> {
        let mut working: Vec<String> = self
            .modified
            .iter()
            .chain(self.untracked.iter())
            .cloned()
            .collect();
        working.sort();
        working.dedup();
        working
    }

    /// Sort every list so results are stable across providers.
    pub(crate) fn sorted(mut self) -> Self {
        self.staged.sort();
        self.staged.dedup();
        self.modified.sort();
        self.modified.dedup();
        self.untracked.sort();
        self
    }
}
