use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{VcsError, VcsResult};
use crate::porcelain::parse_porcelain_z;
use crate::status::ProjectStatus;
use crate::traits::{checked_file, checked_message, VcsProvider};

/// [`VcsProvider`] that shells out to the `git` executable.
///
/// Every command runs with the project root as its working directory and
/// receives file arguments as separate argv entries after `--`, so paths
/// are never interpreted by a shell or as options.
#[derive(Clone, Debug)]
pub struct GitProvider {
    workdir: PathBuf,
    program: String,
}

impl GitProvider {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            program: "git".into(),
        }
    }

    /// Use a different executable in place of `git`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn run(&self, args: &[&str]) -> VcsResult<String> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!(workdir = ?self.workdir, %command, "running provider command");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| VcsError::provider(&command, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let diagnostic = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(VcsError::provider(command, diagnostic));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// The project directory relative to the repository top level.
    async fn prefix(&self) -> VcsResult<String> {
        let out = self.run(&["rev-parse", "--show-prefix"]).await?;
        Ok(out.trim_end_matches(['\n', '\r']).to_string())
    }
}

#[async_trait]
impl VcsProvider for GitProvider {
    async fn stage(&self, file: &str) -> VcsResult<()> {
        let file = checked_file(file)?;
        self.run(&["add", "--", file.as_str()]).await?;
        info!(workdir = ?self.workdir, %file, "staged");
        Ok(())
    }

    async fn unstage(&self, file: &str) -> VcsResult<()> {
        let file = checked_file(file)?;
        self.run(&["reset", "-q", "--", file.as_str()]).await?;
        info!(workdir = ?self.workdir, %file, "unstaged");
        Ok(())
    }

    async fn discard(&self, file: &str) -> VcsResult<()> {
        let file = checked_file(file)?;
        self.run(&["checkout", "--", file.as_str()]).await?;
        info!(workdir = ?self.workdir, %file, "discarded working tree changes");
        Ok(())
    }

    async fn commit(&self, message: &str) -> VcsResult<()> {
        let message = checked_message(message)?;
        self.run(&["commit", "-q", "-m", message]).await?;
        info!(workdir = ?self.workdir, "committed");
        Ok(())
    }

    async fn status(&self) -> VcsResult<ProjectStatus> {
        let prefix = self.prefix().await?;
        let out = self
            .run(&["status", "--porcelain=v1", "-z", "--untracked-files=all", "--", "."])
            .await?;
        parse_porcelain_z(&out, &prefix)
    }
}
