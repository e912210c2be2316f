//! Editor synchronization core for langdesk.
//!
//! Keeps the one open document consistent with storage: what the editor
//! shows ("live"), what storage last held ("baseline"), and whether the
//! two differ ("dirty").
//!
//! # Key Types
//!
//! - [`ModificationTracker`] -- per-path baselines and dirty markers
//! - [`ModifiedIndicator`] -- sink told when a path's marker flips
//! - [`EditorSession`] -- load / edit / save / close state machine
//! - [`SaveConfirmation`] -- "save first?" policy for leaving dirty files
//! - [`Navigator`] -- directory listing and open-from-tree
//!
//! Version control lives in `langdesk-vcs`: a provider may rewrite a
//! file on disk and the session will not notice until the file is loaded
//! again.

pub mod confirm;
pub mod error;
pub mod indicator;
pub mod navigator;
pub mod session;
pub mod syntax;
pub mod tracker;

pub use confirm::{SaveConfirmation, SwitchDecision};
pub use error::{SessionError, SessionResult};
pub use indicator::{IndicatorBoard, IndicatorError, ModifiedIndicator, NoopIndicator};
pub use navigator::Navigator;
pub use session::{EditorSession, SessionSnapshot, SessionState};
pub use syntax::syntax_language;
pub use tracker::ModificationTracker;
