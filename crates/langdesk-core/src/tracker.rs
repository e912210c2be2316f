//! The [`ModificationTracker`]: per-path baselines and derived dirty flags.
//!
//! The tracker stores, for each path it has seen loaded or saved, the
//! content last known to match storage. It never holds live editor content;
//! callers pass the current text into [`ModificationTracker::evaluate`] and
//! get back `current != baseline`. A path with no baseline is dirty.
//!
//! Each path also carries the last derived outcome (its marker). Whenever an
//! evaluation changes the marker, the [`ModifiedIndicator`] is notified
//! before `evaluate` returns.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::indicator::{ModifiedIndicator, NoopIndicator};

/// Baseline map plus dirty markers, reporting marker changes to a sink.
pub struct ModificationTracker {
    baselines: BTreeMap<String, String>,
    dirty: BTreeSet<String>,
    sink: Arc<dyn ModifiedIndicator>,
}

impl std::fmt::Debug for ModificationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModificationTracker")
            .field("baselines", &self.baselines.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for ModificationTracker {
    fn default() -> Self {
        Self::new(Arc::new(NoopIndicator))
    }
}

impl ModificationTracker {
    pub fn new(sink: Arc<dyn ModifiedIndicator>) -> Self {
        Self {
            baselines: BTreeMap::new(),
            dirty: BTreeSet::new(),
            sink,
        }
    }

    /// Record `content` as the baseline for `path`, replacing any prior one.
    pub fn set_baseline(&mut self, path: &str, content: impl Into<String>) {
        self.baselines.insert(path.to_string(), content.into());
    }

    /// The stored baseline, or `None` if `path` was never loaded or saved.
    pub fn baseline(&self, path: &str) -> Option<&str> {
        self.baselines.get(path).map(String::as_str)
    }

    /// Compare `current` to the baseline without touching markers.
    pub fn peek(&self, path: &str, current: &str) -> bool {
        match self.baselines.get(path) {
            Some(baseline) => baseline != current,
            None => true,
        }
    }

    /// Compare `current` to the baseline and update the path's marker.
    ///
    /// Returns `true` if the content is dirty. If the outcome differs from
    /// the previous marker (no marker counts as clean), the sink is told.
    pub fn evaluate(&mut self, path: &str, current: &str) -> bool {
        let dirty = self.peek(path, current);
        let was_dirty = self.dirty.contains(path);
        if dirty != was_dirty {
            if dirty {
                self.dirty.insert(path.to_string());
            } else {
                self.dirty.remove(path);
            }
            self.notify(path, dirty);
        }
        dirty
    }

    /// Forget the baseline and marker for `path`.
    pub fn clear(&mut self, path: &str) {
        self.baselines.remove(path);
        if self.dirty.remove(path) {
            self.notify(path, false);
        }
    }

    /// Forget every baseline and marker.
    pub fn clear_all(&mut self) {
        let dirty = std::mem::take(&mut self.dirty);
        self.baselines.clear();
        for path in dirty {
            self.notify(&path, false);
        }
    }

    /// Whether the last evaluation of `path` came out dirty.
    pub fn is_marked_dirty(&self, path: &str) -> bool {
        self.dirty.contains(path)
    }

    /// Paths whose last evaluation came out dirty, sorted.
    pub fn dirty_paths(&self) -> Vec<String> {
        self.dirty.iter().cloned().collect()
    }

    /// Number of paths with a stored baseline.
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    fn notify(&self, path: &str, modified: bool) {
        debug!(%path, modified, "modified indicator changed");
        if let Err(e) = self.sink.set_modified(path, modified) {
            warn!(%path, error = %e, "modified indicator update failed");
        }
    }
}
