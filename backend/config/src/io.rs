//! Tools file location and loading.

use crate::defaults::TOOLS_FILE_NAME;
use crate::env::EnvDefaults;
use crate::schema::ToolDefinition;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Resolve the devcon config directory.
/// Priority: `DEVCON_CONFIG_DIR` > `~/.devcon/` > `./.devcon`
pub fn config_dir(defaults: &EnvDefaults) -> PathBuf {
    if let Some(dir) = &defaults.config_dir {
        return dir.clone();
    }
    match dirs::home_dir() {
        Some(home) => home.join(".devcon"),
        None => PathBuf::from(".devcon"),
    }
}

/// Resolve the tools file, honouring an explicit `DEVCON_CONFIG`.
pub fn tools_file_path(defaults: &EnvDefaults) -> PathBuf {
    match &defaults.tools_file {
        Some(path) => path.clone(),
        None => config_dir(defaults).join(TOOLS_FILE_NAME),
    }
}

/// Read user tool definitions from disk.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub async fn load_tools_file(path: &Path) -> Result<Option<BTreeMap<String, ToolDefinition>>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Tools file does not exist; using built-ins");
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read tools file: {}", path.display()))?;

    let tools: BTreeMap<String, ToolDefinition> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse tools JSON at: {}", path.display()))?;

    info!(path = %path.display(), count = tools.len(), "Loaded tools file");
    Ok(Some(tools))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_tools_file_wins() {
        let defaults = EnvDefaults {
            tools_file: Some(PathBuf::from("/opt/tools.json")),
            config_dir: Some(PathBuf::from("/etc/devcon")),
            ..Default::default()
        };
        assert_eq!(tools_file_path(&defaults), PathBuf::from("/opt/tools.json"));
    }

    #[test]
    fn tools_file_lives_in_config_dir() {
        let defaults = EnvDefaults {
            config_dir: Some(PathBuf::from("/etc/devcon")),
            ..Default::default()
        };
        assert_eq!(tools_file_path(&defaults), PathBuf::from("/etc/devcon/tools.json"));
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_tools_file(&dir.path().join("tools.json")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_tools_file(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("tools.json"));
    }
}
