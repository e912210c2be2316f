//! HTTP server for langdesk.
//!
//! One JSON API over all configured projects: git status and actions per
//! project, a file tree, and the single editor session. The browser client
//! is served from `static_dir`.

pub mod config;
pub mod editor;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::DeskConfig;
pub use error::{ServerError, ServerResult};
pub use server::DeskServer;
pub use state::{ActiveSession, AppState, Project};
