//! Tool registry validation: per-entry checks with user-friendly messages.

use crate::schema::ToolDefinition;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A validation error with field path and message.
#[derive(Debug, Error)]
#[error("Tool validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Validate every tool in a merged registry.
pub fn validate_registry(tools: &BTreeMap<String, ToolDefinition>) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (name, tool) in tools {
        validate_tool(name, tool, &mut report);
    }
    report
}

fn validate_tool(name: &str, tool: &ToolDefinition, report: &mut ValidationReport) {
    if name.trim().is_empty() {
        report.error("tools", "Tool name cannot be empty");
    }

    if tool.image.trim().is_empty() {
        report.error(format!("{name}.image"), "Image reference is required");
    }

    if let Some(workdir) = &tool.workdir {
        if !Path::new(workdir).is_absolute() {
            report.error(
                format!("{name}.workdir"),
                format!("workdir '{workdir}' must be an absolute container path"),
            );
        }
    }

    for (i, entry) in tool.writable_paths.iter().enumerate() {
        if entry.trim().is_empty() {
            report.error(format!("{name}.writablePaths[{i}]"), "Writable path cannot be empty");
        }
    }

    for key in tool.env.keys() {
        if key.is_empty() || key.contains('=') {
            report.error(
                format!("{name}.env"),
                format!("Invalid environment variable name '{key}'"),
            );
        }
    }

    if tool.share_home == Some(false) && tool.home_read_only.is_some() {
        report.warn(
            format!("{name}.homeReadOnly"),
            "homeReadOnly has no effect while shareHome is false",
        );
    }
}
