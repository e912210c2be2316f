use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "langdesk",
    about = "Local dashboard for editing and git-staging per-language project directories",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./langdesk.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the dashboard server
    Serve(ServeArgs),
    /// Show staged and working files across projects
    Status(StatusArgs),
    /// List configured projects
    Projects,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on, overriding the config file
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
    /// Directory holding the browser client
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Only this project
    pub language: Option<String>,
    /// Include modified and untracked files, not just staged ones
    #[arg(short, long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["langdesk", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.bind.is_none());
            assert!(args.static_dir.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "langdesk",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--static-dir",
            "public",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
            assert_eq!(args.static_dir, Some(PathBuf::from("public")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_bad_bind_fails() {
        assert!(Cli::try_parse_from(["langdesk", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_status_for_one_project() {
        let cli = Cli::try_parse_from(["langdesk", "status", "en", "--all"]).unwrap();
        if let Command::Status(args) = cli.command {
            assert_eq!(args.language.as_deref(), Some("en"));
            assert!(args.all);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "langdesk",
            "projects",
            "--format",
            "json",
            "-v",
            "--config",
            "/etc/langdesk.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Projects));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/langdesk.toml")));
    }

    #[test]
    fn unknown_format_fails() {
        assert!(Cli::try_parse_from(["langdesk", "projects", "--format", "yaml"]).is_err());
    }
}
