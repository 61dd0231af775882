//! Built-in tool table and default values.

use crate::schema::ToolDefinition;
use std::collections::BTreeMap;

/// Container runtime used when neither `DEVCON_RUNTIME` nor `--runtime` is set.
pub const DEFAULT_RUNTIME: &str = "docker";

/// Log level used when `DEVCON_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// File name of the user tool registry inside the config directory.
pub const TOOLS_FILE_NAME: &str = "tools.json";

/// Tool definitions shipped with devcon.
///
/// Writable paths are credential stores the agent keeps under the home
/// directory; they are all directories.
pub fn builtin_tools() -> BTreeMap<String, ToolDefinition> {
    let mut tools = BTreeMap::new();

    tools.insert(
        "codex".to_string(),
        ToolDefinition::new("ghcr.io/devcon-sh/codex:latest")
            .with_command(["codex"])
            .with_writable_paths(["~/.codex"]),
    );
    tools.insert(
        "claude".to_string(),
        ToolDefinition::new("ghcr.io/devcon-sh/claude:latest")
            .with_command(["claude"])
            .with_writable_paths(["~/.claude"]),
    );
    tools.insert(
        "gemini".to_string(),
        ToolDefinition::new("ghcr.io/devcon-sh/gemini:latest")
            .with_command(["gemini"])
            .with_writable_paths(["~/.gemini"]),
    );
    tools.insert(
        "opencode".to_string(),
        ToolDefinition::new("ghcr.io/devcon-sh/opencode:latest")
            .with_command(["opencode"])
            .with_writable_paths(["~/.config/opencode", "~/.local/share/opencode"]),
    );
    tools.insert(
        "aider".to_string(),
        ToolDefinition::new("ghcr.io/devcon-sh/aider:latest")
            .with_command(["aider"])
            .with_env("AIDER_CHECK_UPDATE", "false"),
    );
    tools.insert(
        "shell".to_string(),
        ToolDefinition::new("ghcr.io/devcon-sh/base:latest").with_command(["bash", "-l"]),
    );

    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_have_images_and_absolute_or_home_paths() {
        for (name, def) in builtin_tools() {
            assert!(!def.image.is_empty(), "{name} has no image");
            for path in &def.writable_paths {
                assert!(path.starts_with("~/") || path.starts_with('/'), "{name}: {path}");
            }
        }
    }

    #[test]
    fn codex_keeps_its_credential_store_writable() {
        let tools = builtin_tools();
        assert_eq!(tools["codex"].writable_paths, vec!["~/.codex"]);
        assert_eq!(tools["codex"].share_home, None);
    }
}
