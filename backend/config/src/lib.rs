//! `devcon-config`: tool registry and process-wide defaults.
//!
//! Provides:
//! - Typed tool definition schema (camelCase JSON)
//! - Built-in tool table merged with an optional `tools.json`
//! - Registry validation
//! - `DEVCON_*` environment defaults, read once

pub mod defaults;
pub mod env;
pub mod io;
pub mod registry;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::builtin_tools;
pub use env::EnvDefaults;
pub use io::{config_dir, load_tools_file, tools_file_path};
pub use registry::ToolRegistry;
pub use schema::{ToolDefinition, DEFAULT_WORKDIR};
pub use validation::{validate_registry, ConfigValidationError, ValidationReport};
