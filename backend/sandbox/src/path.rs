//! Path expressions: `~`, `~/rest`, absolute or cwd-relative.

use crate::error::{Result, SandboxError};
use std::path::{Component, Path, PathBuf};

/// Resolve a user path expression to an absolute, lexically normalised host path.
///
/// Only `~` and `~/...` are home-relative; `~user` and other relative forms
/// resolve against the current directory.
pub fn resolve(expr: &str, home: &Path) -> Result<PathBuf> {
    if expr.is_empty() {
        return Err(SandboxError::InvalidPath {
            path: expr.to_string(),
            reason: "empty path expression",
        });
    }

    let joined = if expr == "~" {
        home.to_path_buf()
    } else if let Some(rest) = expr.strip_prefix("~/") {
        home.join(rest.trim_start_matches('/'))
    } else {
        let path = Path::new(expr);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            let cwd = std::env::current_dir()
                .map_err(|e| SandboxError::io("read current directory for", expr, e))?;
            cwd.join(path)
        }
    };

    Ok(normalize(&joined))
}

/// Fail unless `target` is `home` or lies beneath it, compared per path
/// component so `/home/alice2` is not inside `/home/alice`.
pub fn ensure_within_home(target: &Path, home: &Path) -> Result<()> {
    let target = normalize(target);
    let home = normalize(home);
    if target.starts_with(&home) {
        Ok(())
    } else {
        Err(SandboxError::PathEscapesHome { path: target, home })
    }
}

/// Collapse `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
