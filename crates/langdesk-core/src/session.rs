//! The [`EditorSession`]: one open document, synchronised with storage.
//!
//! ```text
//!            load(p)                 edit(≠ baseline)
//!   Empty ──────────────▶ Clean ─────────────────────▶ Dirty
//!                          ▲  ◀───────────────────────  │
//!                          │     edit(= baseline)       │
//!                          └────────── save() ──────────┘
//! ```
//!
//! Switching documents (`load` of another path, `close`, `rebind`) while
//! dirty first asks a [`SaveConfirmation`]. A failed read leaves the
//! session untouched; a failed write leaves it dirty with the baseline
//! unchanged.

use std::sync::Arc;

use langdesk_store::{normalize_path, FileStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::confirm::SaveConfirmation;
use crate::error::{SessionError, SessionResult};
use crate::indicator::ModifiedIndicator;
use crate::syntax::syntax_language;
use crate::tracker::ModificationTracker;

/// Derived state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No file open.
    Empty,
    /// File open, live content equals its baseline.
    Clean,
    /// File open, live content differs from its baseline.
    Dirty,
}

/// Serializable summary of the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub path: Option<String>,
    pub syntax: Option<String>,
}

#[derive(Debug)]
struct OpenDocument {
    path: String,
    live: String,
}

/// Owns the live content of the single open file and the tracker that
/// decides whether it is dirty.
pub struct EditorSession {
    store: Arc<dyn FileStore>,
    tracker: ModificationTracker,
    current: Option<OpenDocument>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("root", &self.store.root())
            .field("current", &self.current_path())
            .field("tracker", &self.tracker)
            .finish()
    }
}

impl EditorSession {
    pub fn new(store: Arc<dyn FileStore>, sink: Arc<dyn ModifiedIndicator>) -> Self {
        Self {
            store,
            tracker: ModificationTracker::new(sink),
            current: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    pub fn tracker(&self) -> &ModificationTracker {
        &self.tracker
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current.as_ref().map(|doc| doc.path.as_str())
    }

    pub fn live_content(&self) -> Option<&str> {
        self.current.as_ref().map(|doc| doc.live.as_str())
    }

    pub fn state(&self) -> SessionState {
        match &self.current {
            None => SessionState::Empty,
            Some(doc) if self.tracker.peek(&doc.path, &doc.live) => SessionState::Dirty,
            Some(_) => SessionState::Clean,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == SessionState::Dirty
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            path: self.current_path().map(str::to_string),
            syntax: self.current_path().map(|p| syntax_language(p).to_string()),
        }
    }

    /// Open `path`, making its stored content both baseline and live text.
    ///
    /// Opening the path that is already open is a no-op and keeps any
    /// unsaved edits.
    pub fn load(
        &mut self,
        path: &str,
        confirm: impl SaveConfirmation,
    ) -> SessionResult<SessionState> {
        let path = normalize_path(path)?;
        if path.is_empty() {
            return Err(SessionError::Validation("cannot open the project root".into()));
        }
        if self.current_path() == Some(path.as_str()) {
            debug!(%path, "already open");
            return Ok(self.state());
        }

        let abandoning = self.settle_current(confirm)?;
        let content = self.store.read(&path)?;

        if let Some(old) = self.current.take() {
            if abandoning {
                info!(path = %old.path, "abandoned unsaved edits");
                self.tracker.clear(&old.path);
            }
        }

        self.tracker.clear(&path);
        self.tracker.set_baseline(&path, content.as_str());
        self.tracker.evaluate(&path, &content);
        info!(%path, bytes = content.len(), "loaded");
        self.current = Some(OpenDocument { path, live: content });
        Ok(SessionState::Clean)
    }

    /// Replace the live content and re-evaluate dirtiness.
    pub fn edit(&mut self, content: impl Into<String>) -> SessionResult<SessionState> {
        let doc = self.current.as_mut().ok_or_else(SessionError::no_active_file)?;
        doc.live = content.into();
        if self.tracker.evaluate(&doc.path, &doc.live) {
            Ok(SessionState::Dirty)
        } else {
            Ok(SessionState::Clean)
        }
    }

    /// Write the live content; on success it becomes the new baseline.
    pub fn save(&mut self) -> SessionResult<SessionState> {
        let doc = self.current.as_ref().ok_or_else(SessionError::no_active_file)?;
        if let Err(e) = self.store.write(&doc.path, &doc.live) {
            warn!(path = %doc.path, error = %e, "save failed");
            return Err(e.into());
        }

        self.tracker.clear(&doc.path);
        self.tracker.set_baseline(&doc.path, doc.live.as_str());
        self.tracker.evaluate(&doc.path, &doc.live);
        info!(path = %doc.path, bytes = doc.live.len(), "saved");
        Ok(SessionState::Clean)
    }

    /// Close the open document, asking to save first if it is dirty.
    pub fn close(&mut self, confirm: impl SaveConfirmation) -> SessionResult<()> {
        self.settle_current(confirm)?;
        if let Some(old) = self.current.take() {
            self.tracker.clear(&old.path);
            debug!(path = %old.path, "closed");
        }
        Ok(())
    }

    /// Close the open document and continue against a different store.
    ///
    /// All baselines belong to the old store and are dropped.
    pub fn rebind(
        &mut self,
        store: Arc<dyn FileStore>,
        confirm: impl SaveConfirmation,
    ) -> SessionResult<()> {
        self.close(confirm)?;
        self.tracker.clear_all();
        info!(root = ?store.root(), "session rebound");
        self.store = store;
        Ok(())
    }

    /// Ask about unsaved edits. Returns `true` when they are to be abandoned.
    fn settle_current(&mut self, mut confirm: impl SaveConfirmation) -> SessionResult<bool> {
        let path = match &self.current {
            Some(doc) if self.tracker.peek(&doc.path, &doc.live) => doc.path.clone(),
            _ => return Ok(false),
        };
        if confirm.confirm_save(&path) {
            self.save()?;
            Ok(false)
        } else {
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::SwitchDecision;
    use crate::indicator::{IndicatorBoard, NoopIndicator};
    use langdesk_store::{InMemoryFileStore, StoreError};
    use langdesk_vcs::{InMemoryVcs, VcsProvider};

    fn never_asked(path: &str) -> bool {
        panic!("confirmation requested for {path}");
    }

    fn make_session(
        files: &[(&'static str, &'static str)],
    ) -> (Arc<InMemoryFileStore>, EditorSession) {
        let store = Arc::new(InMemoryFileStore::with_files(files.iter().copied()).unwrap());
        let session = EditorSession::new(store.clone(), Arc::new(NoopIndicator));
        (store, session)
    }

    #[test]
    fn starts_empty() {
        let (_store, session) = make_session(&[]);
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.current_path(), None);
        assert_eq!(session.snapshot().path, None);
    }

    #[test]
    fn load_seeds_baseline_and_live() {
        let (_store, mut session) = make_session(&[("a.txt", "a")]);
        assert_eq!(session.load("a.txt", never_asked).unwrap(), SessionState::Clean);
        assert_eq!(session.live_content(), Some("a"));
        assert_eq!(session.tracker().baseline("a.txt"), Some("a"));
    }

    #[test]
    fn load_normalises_path() {
        let (_store, mut session) = make_session(&[("tpl/home.tpl", "<p/>")]);
        session.load(".\\tpl\\home.tpl", never_asked).unwrap();
        assert_eq!(session.current_path(), Some("tpl/home.tpl"));
        assert_eq!(session.snapshot().syntax.as_deref(), Some("html"));
    }

    #[test]
    fn load_same_path_twice_is_idempotent() {
        let (store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        store.write("a.txt", "changed on disk").unwrap();

        assert_eq!(session.load("a.txt", never_asked).unwrap(), SessionState::Clean);
        assert_eq!(session.tracker().baseline("a.txt"), Some("a"));
        assert_eq!(session.live_content(), Some("a"));
    }

    #[test]
    fn reopening_same_path_keeps_unsaved_edits() {
        let (_store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("a-edited").unwrap();

        assert_eq!(session.load("./a.txt", never_asked).unwrap(), SessionState::Dirty);
        assert_eq!(session.live_content(), Some("a-edited"));
    }

    #[test]
    fn edit_round_trip_returns_to_clean() {
        let (_store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        assert_eq!(session.edit("ab").unwrap(), SessionState::Dirty);
        assert_eq!(session.edit("abc").unwrap(), SessionState::Dirty);
        assert_eq!(session.edit("a").unwrap(), SessionState::Clean);
        assert_eq!(session.state(), SessionState::Clean);
    }

    #[test]
    fn save_makes_live_the_new_baseline() {
        let (store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("b").unwrap();
        assert!(session.is_dirty());

        assert_eq!(session.save().unwrap(), SessionState::Clean);
        assert_eq!(session.tracker().baseline("a.txt"), Some("b"));
        assert_eq!(store.read("a.txt").unwrap(), "b");
        assert!(!session.tracker().is_marked_dirty("a.txt"));
    }

    #[test]
    fn save_failure_preserves_dirtiness() {
        let (store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("b").unwrap();
        store.set_fail_writes(true);

        assert!(matches!(session.save(), Err(SessionError::Store(StoreError::Io { .. }))));
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.tracker().baseline("a.txt"), Some("a"));
        assert!(session.tracker().is_marked_dirty("a.txt"));
        assert_eq!(session.live_content(), Some("b"));
    }

    #[test]
    fn load_failure_keeps_prior_state() {
        let (_store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("a2").unwrap();

        let result = session.load("missing.txt", SwitchDecision::Discard);
        assert!(matches!(result, Err(SessionError::Store(StoreError::NotFound(_)))));
        assert_eq!(session.current_path(), Some("a.txt"));
        assert_eq!(session.live_content(), Some("a2"));
        assert_eq!(session.state(), SessionState::Dirty);
    }

    #[test]
    fn load_from_empty_failure_stays_empty() {
        let (store, mut session) = make_session(&[("a.txt", "a")]);
        store.set_fail_reads(true);
        assert!(session.load("a.txt", never_asked).is_err());
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.tracker().is_empty());
    }

    #[test]
    fn switching_clean_file_does_not_ask() {
        let (_store, mut session) = make_session(&[("a.txt", "a"), ("b.txt", "b")]);
        session.load("a.txt", never_asked).unwrap();
        session.load("b.txt", never_asked).unwrap();
        assert_eq!(session.current_path(), Some("b.txt"));
        assert_eq!(session.tracker().baseline("a.txt"), Some("a"));
    }

    #[test]
    fn declined_switch_abandons_edits() {
        let (store, mut session) = make_session(&[("a.txt", "a"), ("b.txt", "b")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("a-edited").unwrap();

        let mut asked = Vec::new();
        let state = session
            .load("b.txt", |p: &str| {
                asked.push(p.to_string());
                false
            })
            .unwrap();

        assert_eq!(asked, vec!["a.txt"]);
        assert_eq!(state, SessionState::Clean);
        assert_eq!(session.current_path(), Some("b.txt"));
        assert_eq!(session.tracker().baseline("b.txt"), Some("b"));
        assert_eq!(store.read("a.txt").unwrap(), "a");
        assert!(!session.tracker().is_marked_dirty("a.txt"));
    }

    #[test]
    fn confirmed_switch_saves_first() {
        let (store, mut session) = make_session(&[("a.txt", "a"), ("b.txt", "b")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("a-edited").unwrap();

        session.load("b.txt", SwitchDecision::Save).unwrap();
        assert_eq!(store.read("a.txt").unwrap(), "a-edited");
        assert_eq!(session.tracker().baseline("a.txt"), Some("a-edited"));
        assert_eq!(session.current_path(), Some("b.txt"));
    }

    #[test]
    fn flag_answers_switch_prompt() {
        let (store, mut session) = make_session(&[("a.txt", "a"), ("b.txt", "b")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("kept").unwrap();
        session.load("b.txt", true).unwrap();
        assert_eq!(store.read("a.txt").unwrap(), "kept");

        session.edit("dropped").unwrap();
        session.load("a.txt", false).unwrap();
        assert_eq!(store.read("b.txt").unwrap(), "b");
        assert_eq!(session.live_content(), Some("kept"));
    }

    #[test]
    fn confirmed_switch_with_failing_save_aborts() {
        let (store, mut session) = make_session(&[("a.txt", "a"), ("b.txt", "b")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("a-edited").unwrap();
        store.set_fail_writes(true);

        assert!(session.load("b.txt", SwitchDecision::Save).is_err());
        assert_eq!(session.current_path(), Some("a.txt"));
        assert_eq!(session.state(), SessionState::Dirty);
    }

    #[test]
    fn edit_and_save_without_file_are_validation_errors() {
        let (_store, mut session) = make_session(&[]);
        assert!(matches!(session.edit("x"), Err(SessionError::Validation(_))));
        assert!(matches!(session.save(), Err(SessionError::Validation(_))));
    }

    #[test]
    fn loading_root_or_escape_is_rejected() {
        let (_store, mut session) = make_session(&[]);
        assert!(matches!(session.load("", never_asked), Err(SessionError::Validation(_))));
        assert!(matches!(
            session.load("../x", never_asked),
            Err(SessionError::Store(StoreError::AccessDenied(_)))
        ));
    }

    #[test]
    fn close_clears_tracking() {
        let (_store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("b").unwrap();
        session.close(SwitchDecision::Discard).unwrap();

        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.tracker().baseline("a.txt"), None);
    }

    #[test]
    fn rebind_switches_store_and_drops_baselines() {
        let (_store, mut session) = make_session(&[("a.txt", "a"), ("b.txt", "b")]);
        session.load("b.txt", never_asked).unwrap();
        session.load("a.txt", never_asked).unwrap();

        let other = Arc::new(InMemoryFileStore::with_files([("a.txt", "other")]).unwrap());
        session.rebind(other, never_asked).unwrap();
        assert!(session.tracker().is_empty());

        session.load("a.txt", never_asked).unwrap();
        assert_eq!(session.live_content(), Some("other"));
    }

    #[test]
    fn indicator_follows_session() {
        let store = Arc::new(InMemoryFileStore::with_files([("a.txt", "a")]).unwrap());
        let board = IndicatorBoard::new();
        let mut session = EditorSession::new(store, Arc::new(board.clone()));

        session.load("a.txt", never_asked).unwrap();
        assert!(!board.is_modified("a.txt"));
        session.edit("b").unwrap();
        assert!(board.is_modified("a.txt"));
        session.save().unwrap();
        assert!(!board.is_modified("a.txt"));
    }

    #[test]
    fn snapshot_serializes_state_lowercase() {
        let (_store, mut session) = make_session(&[("a.txt", "a")]);
        session.load("a.txt", never_asked).unwrap();
        session.edit("b").unwrap();
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["state"], "dirty");
        assert_eq!(json["path"], "a.txt");
    }

    #[tokio::test]
    async fn provider_discard_does_not_touch_baseline() {
        let worktree = Arc::new(InMemoryFileStore::with_files([("a.txt", "committed")]).unwrap());
        let vcs = InMemoryVcs::new(worktree.clone());
        let mut session = EditorSession::new(worktree.clone(), Arc::new(NoopIndicator));

        session.load("a.txt", never_asked).unwrap();
        session.edit("draft").unwrap();
        session.save().unwrap();
        session.edit("draft, more").unwrap();
        assert_eq!(session.state(), SessionState::Dirty);

        vcs.discard("a.txt").await.unwrap();
        assert_eq!(worktree.read("a.txt").unwrap(), "committed");

        // The tracker still holds the pre-discard baseline.
        assert_eq!(session.tracker().baseline("a.txt"), Some("draft"));
        assert_eq!(session.state(), SessionState::Dirty);
        assert!(vcs.status().await.unwrap().is_clean());

        session.close(SwitchDecision::Discard).unwrap();
        session.load("a.txt", never_asked).unwrap();
        assert_eq!(session.tracker().baseline("a.txt"), Some("committed"));
        assert_eq!(session.state(), SessionState::Clean);
    }

    #[tokio::test]
    async fn staging_does_not_touch_dirty_state() {
        let worktree = Arc::new(InMemoryFileStore::with_files([("a.txt", "a")]).unwrap());
        let vcs = InMemoryVcs::new(worktree.clone());
        let mut session = EditorSession::new(worktree.clone(), Arc::new(NoopIndicator));

        session.load("a.txt", never_asked).unwrap();
        session.edit("b").unwrap();
        session.save().unwrap();
        session.edit("c").unwrap();

        vcs.stage("a.txt").await.unwrap();
        assert_eq!(session.state(), SessionState::Dirty);
        vcs.unstage("a.txt").await.unwrap();
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.tracker().baseline("a.txt"), Some("b"));
    }
}
