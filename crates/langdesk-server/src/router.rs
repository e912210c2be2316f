use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{editor, handler};

/// Build the axum router with every dashboard endpoint.
///
/// When `static_dir` is configured, anything outside `/api` is served from
/// it.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/health", get(handler::health_handler))
        .route("/api/languages", get(handler::languages_handler))
        .route("/api/files", get(handler::all_files_handler))
        .route("/api/staged-files", get(handler::staged_files_handler))
        .route("/api/files/:language", get(handler::project_files_handler))
        .route("/api/stage", post(handler::stage_handler))
        .route("/api/unstage", post(handler::unstage_handler))
        .route("/api/discard", post(handler::discard_handler))
        .route("/api/commit/:language", post(handler::commit_handler))
        .route("/api/open-editor/:language", post(handler::open_editor_handler))
        .route("/api/project-root", get(handler::project_root_handler))
        .route("/api/tree", get(handler::tree_handler))
        .route("/api/indicators", get(handler::indicators_handler))
        .route("/api/session", get(editor::snapshot_handler))
        .route("/api/session/open", post(editor::open_handler))
        .route("/api/session/edit", post(editor::edit_handler))
        .route("/api/session/save", post(editor::save_handler))
        .route("/api/session/close", post(editor::close_handler))
        .route("/api/session/content", get(editor::content_handler));

    let app = match &state.config.static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
