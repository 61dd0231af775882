//! Tool definition schema.
//!
//! Typed for serde JSON deserialization with camelCase field names, matching
//! the on-disk `tools.json` format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Container path the host working directory is mounted at when a tool does
/// not name its own.
pub const DEFAULT_WORKDIR: &str = "/workspace";

// ---------------------------------------------------------------------------
// Tool definition
// ---------------------------------------------------------------------------

/// Declarative description of one launchable agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Image reference passed to the container runtime.
    pub image: String,

    /// Command run inside the container. Empty means the image entrypoint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    /// Absolute container path the workspace is mounted at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,

    /// Extra environment variables injected into the container.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Per-tool home sharing override. `None` inherits the global default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_home: Option<bool>,

    /// Per-tool read-only override, only meaningful when home is shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_read_only: Option<bool>,

    /// Host paths (`~`, `~/...` or absolute) re-enabled for writing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub writable_paths: Vec<String>,
}

impl ToolDefinition {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_writable_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.writable_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Container working directory, falling back to [`DEFAULT_WORKDIR`].
    pub fn workdir(&self) -> &str {
        self.workdir.as_deref().unwrap_or(DEFAULT_WORKDIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_fields() {
        let raw = r#"{
            "image": "ghcr.io/acme/agent:1",
            "command": ["agent", "--yolo"],
            "shareHome": true,
            "homeReadOnly": false,
            "writablePaths": ["~/.agent"],
            "env": {"AGENT_MODE": "container"}
        }"#;
        let def: ToolDefinition = serde_json::from_str(raw).unwrap();
        assert_eq!(def.image, "ghcr.io/acme/agent:1");
        assert_eq!(def.command, vec!["agent", "--yolo"]);
        assert_eq!(def.share_home, Some(true));
        assert_eq!(def.home_read_only, Some(false));
        assert_eq!(def.writable_paths, vec!["~/.agent"]);
        assert_eq!(def.env["AGENT_MODE"], "container");
    }

    #[test]
    fn unset_overrides_stay_unset() {
        let def: ToolDefinition = serde_json::from_str(r#"{"image": "busybox"}"#).unwrap();
        assert_eq!(def.share_home, None);
        assert_eq!(def.home_read_only, None);
        assert!(def.command.is_empty());
        assert_eq!(def.workdir(), DEFAULT_WORKDIR);
    }
}
