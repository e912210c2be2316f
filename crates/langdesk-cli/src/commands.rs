use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use langdesk_server::{AppState, DeskConfig, DeskServer};
use langdesk_vcs::ProjectStatus;
use serde_json::{json, Value};

use crate::cli::*;

const DEFAULT_CONFIG: &str = "langdesk.toml";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Status(args) => cmd_status(config, args, cli.format).await,
        Command::Projects => cmd_projects(&config, cli.format),
    }
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<&Path>) -> anyhow::Result<DeskConfig> {
    match path {
        Some(path) => DeskConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).is_file() => DeskConfig::load(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("load config {DEFAULT_CONFIG}")),
        None => {
            tracing::debug!("no {DEFAULT_CONFIG}, using defaults");
            Ok(DeskConfig::default())
        }
    }
}

fn apply_overrides(mut config: DeskConfig, args: &ServeArgs) -> DeskConfig {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = &args.static_dir {
        config.static_dir = Some(dir.clone());
    }
    config
}

async fn cmd_serve(config: DeskConfig, args: ServeArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    if config.projects.is_empty() {
        tracing::warn!("no projects configured; add a [projects] table to {DEFAULT_CONFIG}");
    }
    let server = DeskServer::new(config);
    server.serve().await.context("server error")?;
    Ok(())
}

type StatusRow = (String, Result<ProjectStatus, String>);

async fn cmd_status(config: DeskConfig, args: StatusArgs, format: OutputFormat) -> anyhow::Result<()> {
    let state = AppState::from_config(config);
    if let Some(language) = &args.language {
        state.project(language)?;
    }

    let mut rows: Vec<StatusRow> = Vec::new();
    for project in state.projects() {
        if args.language.as_ref().is_some_and(|l| *l != project.name) {
            continue;
        }
        let status = project.vcs.status().await.map_err(|e| e.to_string());
        rows.push((project.name.clone(), status));
    }

    match format {
        OutputFormat::Text => print!("{}", render_status(&rows, args.all)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status_json(&rows))?),
    }
    Ok(())
}

fn render_status(rows: &[StatusRow], all: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Unified Staged Files Panel".bold());
    for (name, status) in rows {
        let _ = writeln!(out, "\n{} {}", "Language:".dimmed(), name.cyan().bold());
        let status = match status {
            Ok(status) => status,
            Err(e) => {
                let _ = writeln!(out, "  {} {e}", "error:".red().bold());
                continue;
            }
        };
        if status.staged.is_empty() {
            let _ = writeln!(out, "  No staged files");
        }
        for file in &status.staged {
            let _ = writeln!(out, "  {} {file}", "staged:".green());
        }
        if all {
            for file in &status.modified {
                let _ = writeln!(out, "  {} {file}", "modified:".yellow());
            }
            for file in &status.untracked {
                let _ = writeln!(out, "  {} {file}", "untracked:".red());
            }
        }
    }
    out
}

fn status_json(rows: &[StatusRow]) -> Value {
    let map: BTreeMap<&str, Value> = rows
        .iter()
        .map(|(name, status)| {
            let value = match status {
                Ok(status) => json!({
                    "staged": status.staged,
                    "modified": status.modified,
                    "untracked": status.untracked,
                    "working": status.working(),
                }),
                Err(e) => json!({ "error": e }),
            };
            (name.as_str(), value)
        })
        .collect();
    json!(map)
}

fn cmd_projects(config: &DeskConfig, format: OutputFormat) -> anyhow::Result<()> {
    if config.projects.is_empty() && format == OutputFormat::Text {
        println!("No projects configured.");
        return Ok(());
    }
    match format {
        OutputFormat::Text => print!("{}", render_projects(&config.projects)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config.projects)?),
    }
    Ok(())
}

fn render_projects(projects: &BTreeMap<String, PathBuf>) -> String {
    let width = projects.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (name, root) in projects {
        let marker = if root.is_dir() { "✓".green() } else { "✗".red() };
        let _ = writeln!(out, "{marker} {:<width$}  {}", name.bold(), root.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    fn status(staged: &[&str], modified: &[&str], untracked: &[&str]) -> ProjectStatus {
        let own = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        ProjectStatus {
            staged: own(staged),
            modified: own(modified),
            untracked: own(untracked),
        }
    }

    #[test]
    fn panel_lists_staged_files_per_language() {
        plain();
        let rows = vec![
            ("de".to_string(), Ok(status(&[], &["a.tpl"], &[]))),
            ("en".to_string(), Ok(status(&["tpl/home.tpl"], &[], &[]))),
        ];
        let text = render_status(&rows, false);
        assert!(text.contains("Language: de\n  No staged files"));
        assert!(text.contains("Language: en\n  staged: tpl/home.tpl"));
        assert!(!text.contains("a.tpl"));
    }

    #[test]
    fn panel_all_includes_working_files() {
        plain();
        let rows = vec![("en".to_string(), Ok(status(&[], &["m.css"], &["new.js"])))];
        let text = render_status(&rows, true);
        assert!(text.contains("modified: m.css"));
        assert!(text.contains("untracked: new.js"));
    }

    #[test]
    fn failing_project_is_reported_in_place() {
        plain();
        let rows = vec![
            ("en".to_string(), Err("not a git repository".to_string())),
            ("fr".to_string(), Ok(ProjectStatus::new())),
        ];
        let text = render_status(&rows, false);
        assert!(text.contains("error: not a git repository"));
        assert!(text.contains("Language: fr"));

        let value = status_json(&rows);
        assert_eq!(value["en"]["error"], "not a git repository");
        assert_eq!(value["fr"]["staged"], json!([]));
    }

    #[test]
    fn overrides_replace_file_values() {
        let args = ServeArgs {
            bind: Some("0.0.0.0:9000".parse().unwrap()),
            static_dir: Some("web".into()),
        };
        let config = apply_overrides(DeskConfig::default(), &args);
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.static_dir, Some(PathBuf::from("web")));
        assert_eq!(config.port_attempts, DeskConfig::default().port_attempts);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/langdesk.toml"))).is_err());
    }

    #[test]
    fn projects_table_marks_missing_roots() {
        plain();
        let dir = tempfile::tempdir().unwrap();
        let mut projects = BTreeMap::new();
        projects.insert("en".to_string(), dir.path().to_path_buf());
        projects.insert("gone".to_string(), PathBuf::from("/nonexistent/gone"));

        let text = render_projects(&projects);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("✓ en"));
        assert!(lines[1].starts_with("✗ gone"));
    }
}
