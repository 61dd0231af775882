//! Merged tool registry: built-ins overlaid with the user's tools file.

use crate::defaults::builtin_tools;
use crate::io::load_tools_file;
use crate::schema::ToolDefinition;
use crate::validation::validate_registry;
use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Name → definition mapping, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolRegistry {
    /// Registry with only the built-in tools.
    pub fn builtin() -> Self {
        Self {
            tools: builtin_tools(),
        }
    }

    /// Overlay user definitions. A user entry replaces the built-in of the
    /// same name as a whole.
    pub fn merge(&mut self, user: BTreeMap<String, ToolDefinition>) {
        for (name, tool) in user {
            if self.tools.insert(name.clone(), tool).is_some() {
                debug!(tool = %name, "User definition replaces built-in");
            }
        }
    }

    /// Load built-ins plus the tools file at `path`, then validate the result.
    pub async fn load(path: &Path) -> Result<Self> {
        let mut registry = Self::builtin();
        if let Some(user) = load_tools_file(path).await? {
            registry.merge(user);
        }
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        let report = validate_registry(&self.tools);
        for warning in &report.warnings {
            warn!(path = %warning.path, message = %warning.message, "Tool config warning");
        }
        if !report.is_valid() {
            bail!("invalid tool configuration: {report}");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ToolDefinition)> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
