//! The modified-indicator side channel.
//!
//! The tracker reports every change of a path's dirty outcome to a
//! [`ModifiedIndicator`]. Sinks are fire-and-forget: an error is logged by
//! the tracker and otherwise ignored.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// A sink failed to record an indicator change.
#[derive(Debug, thiserror::Error)]
#[error("indicator update failed for {path}: {reason}")]
pub struct IndicatorError {
    pub path: String,
    pub reason: String,
}

/// Receives per-path modified flags, e.g. to mark entries in a file tree.
pub trait ModifiedIndicator: Send + Sync {
    fn set_modified(&self, path: &str, modified: bool) -> Result<(), IndicatorError>;
}

/// Sink that discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopIndicator;

impl ModifiedIndicator for NoopIndicator {
    fn set_modified(&self, _path: &str, _modified: bool) -> Result<(), IndicatorError> {
        Ok(())
    }
}

/// Shared board of paths currently flagged as modified.
///
/// Clones share the same board, so one handle can be given to the tracker
/// and another to whatever renders the flags.
#[derive(Clone, Debug, Default)]
pub struct IndicatorBoard {
    flags: Arc<RwLock<BTreeMap<String, bool>>>,
}

impl IndicatorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` is currently flagged as modified.
    pub fn is_modified(&self, path: &str) -> bool {
        self.flags
            .read()
            .map(|flags| flags.get(path).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    /// All flagged paths, sorted.
    pub fn modified_paths(&self) -> Vec<String> {
        self.flags
            .read()
            .map(|flags| flags.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ModifiedIndicator for IndicatorBoard {
    fn set_modified(&self, path: &str, modified: bool) -> Result<(), IndicatorError> {
        let mut flags = self.flags.write().map_err(|e| IndicatorError {
            path: path.to_string(),
            reason: format!("lock poisoned: {e}"),
        })?;
        if modified {
            flags.insert(path.to_string(), true);
        } else {
            flags.remove(path);
        }
        Ok(())
    }
}
