use serde::{Deserialize, Serialize};

/// Answers "save the current file first?" before the session leaves a
/// dirty document.
///
/// Only consulted when the open document is dirty. Returning `true` saves
/// before switching; `false` abandons the unsaved edits.
pub trait SaveConfirmation {
    fn confirm_save(&mut self, path: &str) -> bool;
}

impl<F> SaveConfirmation for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm_save(&mut self, path: &str) -> bool {
        self(path)
    }
}

/// A fixed answer: `true` saves, `false` discards.
impl SaveConfirmation for bool {
    fn confirm_save(&mut self, _path: &str) -> bool {
        *self
    }
}

/// A decision made up front, e.g. from a request flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchDecision {
    Save,
    Discard,
}

impl From<bool> for SwitchDecision {
    fn from(save: bool) -> Self {
        if save {
            Self::Save
        } else {
            Self::Discard
        }
    }
}

impl SaveConfirmation for SwitchDecision {
    fn confirm_save(&mut self, _path: &str) -> bool {
        *self == Self::Save
    }
}
