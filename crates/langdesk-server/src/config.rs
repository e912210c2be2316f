use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Dashboard configuration, normally read from `langdesk.toml`.
///
/// ```toml
/// bind_addr = "127.0.0.1:3001"
/// static_dir = "public"
///
/// [projects]
/// en = "/work/site/lan/en"
/// de = "/work/site/lan/de"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub bind_addr: SocketAddr,
    /// How many consecutive ports to try when `bind_addr` is taken.
    pub port_attempts: u16,
    pub static_dir: Option<PathBuf>,
    /// Command used by `/api/open-editor`; the project root is appended.
    pub external_editor: String,
    /// Project name (e.g. a language code) to project root.
    pub projects: BTreeMap<String, PathBuf>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            port_attempts: 10,
            static_dir: None,
            external_editor: "code".into(),
            projects: BTreeMap::new(),
        }
    }
}

impl DeskConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a config file. Relative project and static paths are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for root in self.projects.values_mut() {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        if let Some(dir) = self.static_dir.as_mut() {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DeskConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3001".parse::<SocketAddr>().unwrap());
        assert_eq!(c.port_attempts, 10);
        assert_eq!(c.external_editor, "code");
        assert!(c.projects.is_empty());
        assert!(c.static_dir.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = DeskConfig::from_toml_str(
            r#"
            external_editor = "code -n"

            [projects]
            en = "/srv/lan/en"
            "#,
        )
        .unwrap();
        assert_eq!(c.external_editor, "code -n");
        assert_eq!(c.port_attempts, 10);
        assert_eq!(c.projects["en"], PathBuf::from("/srv/lan/en"));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let err = DeskConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("langdesk.toml");
        std::fs::write(
            &file,
            "static_dir = \"public\"\n[projects]\nen = \"lan/en\"\nabs = \"/srv/x\"\n",
        )
        .unwrap();

        let c = DeskConfig::load(&file).unwrap();
        assert_eq!(c.projects["en"], dir.path().join("lan/en"));
        assert_eq!(c.projects["abs"], PathBuf::from("/srv/x"));
        assert_eq!(c.static_dir, Some(dir.path().join("public")));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = DeskConfig::load(Path::new("/nonexistent/langdesk.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
