//! Process-wide defaults taken from `DEVCON_*` environment variables.
//!
//! The environment is read once at startup into an [`EnvDefaults`] value
//! that is passed down explicitly; nothing below the CLI reads process
//! state on its own.

use crate::defaults::{DEFAULT_LOG_LEVEL, DEFAULT_RUNTIME};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::warn;

pub const SHARE_HOME_VAR: &str = "DEVCON_SHARE_HOME";
pub const HOME_READONLY_VAR: &str = "DEVCON_HOME_READONLY";
pub const RUNTIME_VAR: &str = "DEVCON_RUNTIME";
pub const TOOLS_FILE_VAR: &str = "DEVCON_CONFIG";
pub const CONFIG_DIR_VAR: &str = "DEVCON_CONFIG_DIR";
pub const LOG_LEVEL_VAR: &str = "DEVCON_LOG";
pub const LOG_DIR_VAR: &str = "DEVCON_LOG_DIR";

const VAR_PREFIX: &str = "DEVCON_";

/// Global defaults resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDefaults {
    /// Share the home directory when neither the tool nor the CLI says otherwise.
    pub share_home: bool,
    /// Mount a shared home read-only unless the tool overrides it.
    pub home_read_only: bool,
    /// Container runtime executable.
    pub runtime: String,
    /// Explicit tools file, bypassing the config directory lookup.
    pub tools_file: Option<PathBuf>,
    /// Explicit config directory.
    pub config_dir: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// Problems found while reading the environment, emitted later by
    /// [`EnvDefaults::log_warnings`].
    pub warnings: Vec<String>,
}

impl Default for EnvDefaults {
    fn default() -> Self {
        Self {
            share_home: false,
            home_read_only: true,
            runtime: DEFAULT_RUNTIME.to_string(),
            tools_file: None,
            config_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
            warnings: Vec::new(),
        }
    }
}

impl EnvDefaults {
    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Keep only `DEVCON_*` variables. Values that are not valid UTF-8 are
    /// ignored with a warning; other variables are never decoded.
    fn from_os_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        let mut env = HashMap::new();
        let mut rejected = Vec::new();
        for (key, value) in vars {
            let Some(key) = key.to_str().filter(|k| k.starts_with(VAR_PREFIX)) else {
                continue;
            };
            match value.into_string() {
                Ok(value) => {
                    env.insert(key.to_string(), value);
                }
                Err(_) => rejected.push(format!("{key} is not valid UTF-8; ignored")),
            }
        }

        let mut defaults = Self::from_map(&env);
        rejected.sort();
        rejected.append(&mut defaults.warnings);
        defaults.warnings = rejected;
        defaults
    }

    /// Emit the collected warnings. Call once the logger is installed.
    pub fn log_warnings(&self) {
        for message in &self.warnings {
            warn!("{message}");
        }
    }

    /// Resolve defaults from an explicit variable map (useful for testing).
    pub fn from_map(env: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let mut warnings = Vec::new();
        let get = |name: &str| {
            env.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        Self {
            share_home: get(SHARE_HOME_VAR)
                .map(|v| parse_bool(SHARE_HOME_VAR, v, defaults.share_home, &mut warnings))
                .unwrap_or(defaults.share_home),
            home_read_only: get(HOME_READONLY_VAR)
                .map(|v| {
                    parse_bool(HOME_READONLY_VAR, v, defaults.home_read_only, &mut warnings)
                })
                .unwrap_or(defaults.home_read_only),
            runtime: get(RUNTIME_VAR)
                .map(str::to_string)
                .unwrap_or(defaults.runtime),
            tools_file: get(TOOLS_FILE_VAR).map(PathBuf::from),
            config_dir: get(CONFIG_DIR_VAR).map(PathBuf::from),
            log_level: get(LOG_LEVEL_VAR)
                .map(str::to_string)
                .unwrap_or(defaults.log_level),
            log_dir: get(LOG_DIR_VAR).map(PathBuf::from),
            warnings,
        }
    }
}

/// Parse a boolean flag value, falling back to `default` on anything unknown.
fn parse_bool(name: &str, value: &str, default: bool, warnings: &mut Vec<String>) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warnings.push(format!(
                "{name}={value:?} is not a recognised boolean; using default {default}"
            ));
            default
        }
    }
}
