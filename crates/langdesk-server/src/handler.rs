//! Project and version-control endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use langdesk_store::DirEntry;
use langdesk_vcs::{open_in_editor, ProjectStatus, VcsError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ServerResult;
use crate::state::{blocking, AppState};

type AppStateRef = State<Arc<AppState>>;

/// Body of `/api/stage`, `/api/unstage` and `/api/discard`.
#[derive(Debug, Deserialize)]
pub struct FileAction {
    pub language: String,
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    pub language: String,
    #[serde(default)]
    pub path: String,
}

/// Status of one project as shown in the panel.
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub working: Vec<String>,
}

impl From<ProjectStatus> for FilesResponse {
    fn from(status: ProjectStatus) -> Self {
        let working = status.working();
        Self {
            staged: status.staged,
            modified: status.modified,
            untracked: status.untracked,
            working,
        }
    }
}

/// A tree entry with the editor's modified flag.
#[derive(Debug, Serialize)]
pub struct TreeEntry {
    #[serde(flatten)]
    pub entry: DirEntry,
    pub modified: bool,
}

#[derive(Debug, Serialize)]
pub struct TreeResponse {
    pub language: String,
    pub path: String,
    pub entries: Vec<TreeEntry>,
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn languages_handler(State(state): AppStateRef) -> Json<Vec<String>> {
    Json(state.project_names())
}

/// Staged and working files of every project. A failing project reports
/// its error in place instead of failing the whole response.
pub async fn all_files_handler(State(state): AppStateRef) -> Json<BTreeMap<String, Value>> {
    let mut all = BTreeMap::new();
    for project in state.projects() {
        let entry = match project.vcs.status().await {
            Ok(status) => json!({
                "staged": status.staged,
                "working": status.working(),
            }),
            Err(e) => json!({
                "staged": [],
                "working": [],
                "error": format!("failed to get files: {e}"),
            }),
        };
        all.insert(project.name.clone(), entry);
    }
    Json(all)
}

pub async fn staged_files_handler(State(state): AppStateRef) -> Json<BTreeMap<String, Value>> {
    let mut all = BTreeMap::new();
    for project in state.projects() {
        let entry = match project.vcs.status().await {
            Ok(status) => json!(status.staged),
            Err(e) => json!({ "error": format!("failed to get staged files: {e}") }),
        };
        all.insert(project.name.clone(), entry);
    }
    Json(all)
}

pub async fn project_files_handler(
    State(state): AppStateRef,
    Path(language): Path<String>,
) -> ServerResult<Json<FilesResponse>> {
    let project = state.project(&language)?;
    let status = project.vcs.status().await?;
    Ok(Json(status.into()))
}

pub async fn stage_handler(
    State(state): AppStateRef,
    Json(req): Json<FileAction>,
) -> ServerResult<Json<Value>> {
    state.project(&req.language)?.vcs.stage(&req.file).await?;
    Ok(success())
}

pub async fn unstage_handler(
    State(state): AppStateRef,
    Json(req): Json<FileAction>,
) -> ServerResult<Json<Value>> {
    state.project(&req.language)?.vcs.unstage(&req.file).await?;
    Ok(success())
}

/// Restore a file from the index. An open editor is not reloaded; it
/// keeps its own baseline until the file is opened again.
pub async fn discard_handler(
    State(state): AppStateRef,
    Json(req): Json<FileAction>,
) -> ServerResult<Json<Value>> {
    state.project(&req.language)?.vcs.discard(&req.file).await?;
    Ok(success())
}

pub async fn commit_handler(
    State(state): AppStateRef,
    Path(language): Path<String>,
    Json(req): Json<CommitRequest>,
) -> ServerResult<Json<Value>> {
    let project = state.project(&language)?;
    let status = project.vcs.status().await?;
    if !status.has_staged_changes() {
        return Err(VcsError::Validation("no staged files to commit".into()).into());
    }
    project.vcs.commit(&req.message).await?;
    info!(project = %language, files = status.staged.len(), "committed");
    Ok(success())
}

pub async fn open_editor_handler(
    State(state): AppStateRef,
    Path(language): Path<String>,
) -> ServerResult<Json<Value>> {
    let project = state.project(&language)?;
    let pid = open_in_editor(&state.config.external_editor, project.store.root())?;
    Ok(Json(json!({ "success": true, "pid": pid })))
}

pub async fn project_root_handler(
    State(state): AppStateRef,
    Query(query): Query<LanguageQuery>,
) -> ServerResult<Json<Value>> {
    let project = state.project(&query.language)?;
    Ok(Json(json!({
        "language": project.name,
        "path": project.store.root(),
    })))
}

pub async fn tree_handler(
    State(state): AppStateRef,
    Query(query): Query<TreeQuery>,
) -> ServerResult<Json<TreeResponse>> {
    let navigator = state.project(&query.language)?.navigator();
    let path = query.path.clone();
    let children = blocking(move || Ok(navigator.list_children(&path)?)).await?;

    // Flags are keyed by path alone, so only the session's project shows them.
    let flagged = state.active_project().await.as_deref() == Some(query.language.as_str());
    let indicators = state.indicators();
    let entries = children
        .into_iter()
        .map(|entry| TreeEntry {
            modified: flagged && indicators.is_modified(&entry.path),
            entry,
        })
        .collect();
    Ok(Json(TreeResponse {
        language: query.language,
        path: query.path,
        entries,
    }))
}

pub async fn indicators_handler(State(state): AppStateRef) -> Json<Value> {
    Json(json!({ "modified": state.indicators().modified_paths() }))
}
