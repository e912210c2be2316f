use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::error::{VcsError, VcsResult};

/// Launch an external editor on `root` and return without waiting.
///
/// `command` is split on whitespace; the first word is the program and the
/// rest are passed before the root directory, e.g. `"code -n"`.
pub fn open_in_editor(command: &str, root: &Path) -> VcsResult<u32> {
    let mut words = command.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| VcsError::Validation("no external editor configured".into()))?;

    let child = Command::new(program)
        .args(words)
        .arg(root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| VcsError::provider(command, e.to_string()))?;

    let pid = child.id().unwrap_or_default();
    info!(%command, ?root, pid, "external editor launched");
    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_command_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_in_editor("   ", dir.path()),
            Err(VcsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn missing_program_is_a_provider_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_in_editor("langdesk-no-such-editor --wait", dir.path()).unwrap_err();
        match err {
            VcsError::Provider { command, .. } => {
                assert_eq!(command, "langdesk-no-such-editor --wait");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn spawns_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_in_editor("true", dir.path()).is_ok());
    }
}
