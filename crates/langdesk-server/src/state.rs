use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use langdesk_core::{EditorSession, IndicatorBoard, Navigator};
use langdesk_store::{DirEntry, FileStore, FsFileStore, StoreError, StoreResult};
use langdesk_vcs::{GitProvider, ProjectStatus, VcsError, VcsProvider, VcsResult};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

use crate::config::DeskConfig;
use crate::error::{ServerError, ServerResult};

/// Run file store work off the async workers.
pub(crate) async fn blocking<T, F>(work: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ServerResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(format!("blocking task failed: {e}")))?
}

/// One configured project: its files and its version control.
#[derive(Clone)]
pub struct Project {
    pub name: String,
    pub store: Arc<dyn FileStore>,
    pub vcs: Arc<dyn VcsProvider>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn FileStore>,
        vcs: Arc<dyn VcsProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            store,
            vcs,
        }
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.store.clone())
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("root", &self.store.root())
            .finish()
    }
}

/// Stands in for a project whose root could not be opened.
///
/// Every file operation fails with [`StoreError::InvalidRoot`] and every
/// provider call with the original open error, so one broken project is
/// reported in place while the others keep working.
#[derive(Debug)]
struct UnavailableProject {
    root: PathBuf,
    reason: String,
}

impl UnavailableProject {
    fn store_error(&self) -> StoreError {
        StoreError::InvalidRoot(self.root.clone())
    }

    fn vcs_error(&self) -> VcsError {
        VcsError::provider("open project", self.reason.clone())
    }
}

impl FileStore for UnavailableProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, _path: &str) -> StoreResult<String> {
        Err(self.store_error())
    }

    fn write(&self, _path: &str, _content: &str) -> StoreResult<()> {
        Err(self.store_error())
    }

    fn list(&self, _path: &str) -> StoreResult<Vec<DirEntry>> {
        Err(self.store_error())
    }
}

#[async_trait]
impl VcsProvider for UnavailableProject {
    async fn stage(&self, _file: &str) -> VcsResult<()> {
        Err(self.vcs_error())
    }

    async fn unstage(&self, _file: &str) -> VcsResult<()> {
        Err(self.vcs_error())
    }

    async fn discard(&self, _file: &str) -> VcsResult<()> {
        Err(self.vcs_error())
    }

    async fn commit(&self, _message: &str) -> VcsResult<()> {
        Err(self.vcs_error())
    }

    async fn status(&self) -> VcsResult<ProjectStatus> {
        Err(self.vcs_error())
    }
}

/// The editor session together with the project its store belongs to.
#[derive(Debug)]
pub struct ActiveSession {
    pub project: String,
    pub session: EditorSession,
}

/// Shared state behind every handler.
pub struct AppState {
    pub config: DeskConfig,
    projects: BTreeMap<String, Project>,
    session: Arc<Mutex<Option<ActiveSession>>>,
    indicators: IndicatorBoard,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("projects", &self.projects.keys().collect::<Vec<_>>())
            .field("indicators", &self.indicators.modified_paths().len())
            .finish()
    }
}

impl AppState {
    /// Open every configured project on disk with a git provider.
    ///
    /// A project whose root cannot be opened stays listed; its requests
    /// fail with the open error.
    pub fn from_config(config: DeskConfig) -> Self {
        let mut projects = Vec::with_capacity(config.projects.len());
        for (name, root) in &config.projects {
            let project = match FsFileStore::open(root) {
                Ok(store) => {
                    let vcs = GitProvider::new(store.root());
                    Project::new(name.clone(), Arc::new(store), Arc::new(vcs))
                }
                Err(e) => {
                    warn!(project = %name, error = %e, "project unavailable");
                    let broken = Arc::new(UnavailableProject {
                        root: root.clone(),
                        reason: e.to_string(),
                    });
                    Project::new(name.clone(), broken.clone(), broken)
                }
            };
            projects.push(project);
        }
        Self::with_projects(config, projects)
    }

    /// Build state from ready-made projects; `config.projects` is not consulted.
    pub fn with_projects(config: DeskConfig, projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            config,
            projects: projects.into_iter().map(|p| (p.name.clone(), p)).collect(),
            session: Arc::new(Mutex::new(None)),
            indicators: IndicatorBoard::new(),
        }
    }

    pub fn project(&self, name: &str) -> ServerResult<&Project> {
        self.projects
            .get(name)
            .ok_or_else(|| ServerError::ProjectNotFound(name.to_string()))
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn project_names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn indicators(&self) -> &IndicatorBoard {
        &self.indicators
    }

    /// Take the single editor slot, failing with `Busy` if it is held.
    ///
    /// The guard is owned so it can move into a blocking task.
    pub fn lock_session(&self) -> ServerResult<OwnedMutexGuard<Option<ActiveSession>>> {
        self.session.clone().try_lock_owned().map_err(|_| ServerError::Busy)
    }

    /// The project the editor session is bound to, waiting for any
    /// in-flight session operation to finish.
    pub async fn active_project(&self) -> Option<String> {
        self.session.lock().await.as_ref().map(|active| active.project.clone())
    }

    /// A fresh session on `project` that reports to the indicator board.
    pub fn new_session(&self, project: &Project) -> ActiveSession {
        ActiveSession {
            project: project.name.clone(),
            session: EditorSession::new(project.store.clone(), Arc::new(self.indicators.clone())),
        }
    }
}
