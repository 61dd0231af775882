//! Mount policy: decides what of the host filesystem a tool sees and how.
//!
//! Home sharing is a tri-state at the tool and CLI layers, merged over the
//! global default by [`merge_override`]. Sensitive-path masking is decided
//! here as well but does not depend on the home policy.

use crate::error::{Result, SandboxError};
use crate::path::{ensure_within_home, resolve};
use crate::scan::{scan, SensitivePath};
use devcon_config::{EnvDefaults, ToolDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Per-run overrides taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOverrides {
    /// `--share-home` / `--no-share-home`; `None` when neither was given.
    pub share_home: Option<bool>,
    /// `--image`.
    pub image: Option<String>,
}

/// Non-fatal policy conflicts surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyWarning {
    /// Home is shared read-write, so the tool's writable paths are already
    /// writable and are not mounted again.
    WritablePathsIgnored { count: usize },
}

/// A writable path entry after resolution and containment checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritablePath {
    pub entry: String,
    pub host_path: PathBuf,
}

/// Everything the invocation builder needs to lay out mounts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountDecision {
    pub share_home: bool,
    pub home_read_only: bool,
    pub mount_writable_paths: bool,
    /// Resolved entries; empty unless `mount_writable_paths`.
    pub writable_paths: Vec<WritablePath>,
    pub sensitive_paths: Vec<SensitivePath>,
    pub warnings: Vec<PolicyWarning>,
}

/// Later layers win: `cli` over `tool` over `default`.
pub fn merge_override(default: bool, tool: Option<bool>, cli: Option<bool>) -> bool {
    cli.or(tool).unwrap_or(default)
}

/// Resolve the mount policy for `tool` run from `workspace_dir`.
///
/// Fails with [`SandboxError::WritablePathResolutionFailed`] if any writable
/// path that has to be mounted does not resolve inside `home_dir`; no
/// partial decision is returned.
pub fn decide(
    tool: &ToolDefinition,
    overrides: &LaunchOverrides,
    defaults: &EnvDefaults,
    home_dir: &Path,
    workspace_dir: &Path,
) -> Result<MountDecision> {
    let share_home = merge_override(defaults.share_home, tool.share_home, overrides.share_home);
    let has_writable = !tool.writable_paths.is_empty();
    let mut warnings = Vec::new();

    let (home_read_only, mount_writable_paths) = if share_home {
        let read_only = tool.home_read_only.unwrap_or(defaults.home_read_only);
        if !read_only && has_writable {
            warn!(
                count = tool.writable_paths.len(),
                "Home is shared read-write; writablePaths are ignored"
            );
            warnings.push(PolicyWarning::WritablePathsIgnored {
                count: tool.writable_paths.len(),
            });
        }
        (read_only, read_only && has_writable)
    } else {
        (false, has_writable)
    };

    let writable_paths = if mount_writable_paths {
        resolve_writable_paths(&tool.writable_paths, home_dir)?
    } else {
        Vec::new()
    };

    let sensitive_paths = scan(workspace_dir);

    debug!(
        share_home,
        home_read_only,
        mount_writable_paths,
        writable = writable_paths.len(),
        masked = sensitive_paths.len(),
        "Mount policy resolved"
    );

    Ok(MountDecision {
        share_home,
        home_read_only,
        mount_writable_paths,
        writable_paths,
        sensitive_paths,
        warnings,
    })
}

fn resolve_writable_paths(entries: &[String], home_dir: &Path) -> Result<Vec<WritablePath>> {
    entries
        .iter()
        .map(|entry| {
            let host_path = resolve(entry, home_dir)
                .and_then(|path| ensure_within_home(&path, home_dir).map(|()| path))
                .map_err(|source| SandboxError::WritablePathResolutionFailed {
                    entry: entry.clone(),
                    source: Box::new(source),
                })?;
            Ok(WritablePath {
                entry: entry.clone(),
                host_path,
            })
        })
        .collect()
}
