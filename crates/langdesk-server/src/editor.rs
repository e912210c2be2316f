//! Editor session endpoints.
//!
//! The browser editor posts its live text to `/api/session/edit`; the
//! server owns the only [`EditorSession`](langdesk_core::EditorSession).
//! Leaving a dirty file requires an explicit `save_current` flag, otherwise
//! the request is answered with 409 and nothing changes.
//!
//! Handlers that touch the file store hold the session guard inside a
//! blocking task; the slot stays busy until that task finishes.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use langdesk_core::{syntax_language, SessionError, SessionSnapshot, SwitchDecision};
use langdesk_store::normalize_path;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::state::{blocking, ActiveSession, AppState};

type AppStateRef = State<Arc<AppState>>;

#[derive(Debug, Deserialize)]
pub struct OpenRequest {
    pub language: String,
    pub path: String,
    pub save_current: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseRequest {
    pub save_current: Option<bool>,
}

/// Session snapshot plus the project it is bound to.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub project: Option<String>,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

impl SessionView {
    fn of(active: Option<&ActiveSession>) -> Self {
        match active {
            Some(active) => Self {
                project: Some(active.project.clone()),
                snapshot: active.session.snapshot(),
            },
            None => Self {
                project: None,
                snapshot: SessionSnapshot {
                    state: langdesk_core::SessionState::Empty,
                    path: None,
                    syntax: None,
                },
            },
        }
    }
}

fn no_file_open() -> ServerError {
    SessionError::Validation("no file is open".into()).into()
}

/// How to treat unsaved edits when leaving the current file.
fn switch_decision(
    active: Option<&ActiveSession>,
    save_current: Option<bool>,
) -> ServerResult<SwitchDecision> {
    if let Some(save) = save_current {
        return Ok(save.into());
    }
    match active {
        Some(active) if active.session.is_dirty() => {
            let path = active.session.current_path().unwrap_or_default();
            Err(ServerError::ConfirmationRequired(path.to_string()))
        }
        _ => Ok(SwitchDecision::Discard),
    }
}

pub async fn snapshot_handler(State(state): AppStateRef) -> ServerResult<Json<SessionView>> {
    let slot = state.lock_session()?;
    Ok(Json(SessionView::of(slot.as_ref())))
}

pub async fn open_handler(
    State(state): AppStateRef,
    Json(req): Json<OpenRequest>,
) -> ServerResult<Json<SessionView>> {
    let project = state.project(&req.language)?.clone();
    let path = normalize_path(&req.path)?;
    let mut slot = state.lock_session()?;

    let view = blocking(move || {
        let same_file = slot.as_ref().is_some_and(|active| {
            active.project == project.name && active.session.current_path() == Some(path.as_str())
        });
        let decision = if same_file {
            SwitchDecision::Discard
        } else {
            switch_decision(slot.as_ref(), req.save_current)?
        };

        match slot.as_mut() {
            Some(active) if active.project == project.name => {
                active.session.load(&path, decision)?;
            }
            Some(active) => {
                // Fail before leaving the current project if the target is unreadable.
                project.store.read(&path)?;
                active.session.rebind(project.store.clone(), decision)?;
                active.project = project.name.clone();
                active.session.load(&path, decision)?;
                info!(project = %project.name, "session moved to project");
            }
            None => {
                let mut fresh = state.new_session(&project);
                fresh.session.load(&path, decision)?;
                *slot = Some(fresh);
            }
        }
        Ok(SessionView::of(slot.as_ref()))
    })
    .await?;
    Ok(Json(view))
}

pub async fn edit_handler(
    State(state): AppStateRef,
    Json(req): Json<EditRequest>,
) -> ServerResult<Json<SessionView>> {
    let mut slot = state.lock_session()?;
    let active = slot.as_mut().ok_or_else(no_file_open)?;
    active.session.edit(req.content)?;
    Ok(Json(SessionView::of(slot.as_ref())))
}

pub async fn save_handler(State(state): AppStateRef) -> ServerResult<Json<SessionView>> {
    let mut slot = state.lock_session()?;
    let view = blocking(move || {
        let active = slot.as_mut().ok_or_else(no_file_open)?;
        active.session.save()?;
        Ok(SessionView::of(slot.as_ref()))
    })
    .await?;
    Ok(Json(view))
}

pub async fn close_handler(
    State(state): AppStateRef,
    body: Option<Json<CloseRequest>>,
) -> ServerResult<Json<SessionView>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let mut slot = state.lock_session()?;
    let decision = switch_decision(slot.as_ref(), req.save_current)?;
    let view = blocking(move || {
        if let Some(active) = slot.as_mut() {
            active.session.close(decision)?;
        }
        Ok(SessionView::of(slot.as_ref()))
    })
    .await?;
    Ok(Json(view))
}

pub async fn content_handler(State(state): AppStateRef) -> ServerResult<Json<Value>> {
    let slot = state.lock_session()?;
    let session = &slot.as_ref().ok_or_else(no_file_open)?.session;
    let path = session.current_path().ok_or_else(no_file_open)?;
    Ok(Json(json!({
        "path": path,
        "content": session.live_content().unwrap_or_default(),
        "syntax": syntax_language(path),
        "dirty": session.is_dirty(),
    })))
}
