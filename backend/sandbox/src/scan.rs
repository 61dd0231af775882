//! Sensitive path scanner: finds credential files in the workspace that must
//! be masked inside the container.
//!
//! This is a denylist against accidental leakage into an agent's view of the
//! workspace, not a boundary against a hostile workspace.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Workspace-relative paths masked whenever they exist.
pub const KNOWN_CREDENTIAL_PATHS: &[&str] = &[
    ".git/config",
    ".git/credentials",
    ".git-credentials",
    ".git/HEAD",
    ".git/index",
];

/// Workspace-root entries starting with this prefix are masked.
pub const ENV_FILE_PREFIX: &str = ".env";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
}

/// A credential path discovered in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitivePath {
    pub host_path: PathBuf,
    /// Location relative to the workspace root, and so relative to the
    /// workspace mount point inside the container.
    pub relative_path: PathBuf,
    pub kind: PathKind,
}

impl SensitivePath {
    /// Where this path appears inside the container.
    pub fn container_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.relative_path)
    }
}

/// Scan `workspace` for paths to mask, `.env*` entries first (sorted by
/// name), then the known credential paths in table order.
pub fn scan(workspace: &Path) -> Vec<SensitivePath> {
    let mut found = scan_env_files(workspace);

    for relative in KNOWN_CREDENTIAL_PATHS {
        let host_path = workspace.join(relative);
        let Ok(meta) = fs::metadata(&host_path) else {
            continue;
        };
        let kind = if meta.is_dir() {
            PathKind::Dir
        } else {
            PathKind::File
        };
        found.push(SensitivePath {
            host_path,
            relative_path: PathBuf::from(relative),
            kind,
        });
    }

    debug!(workspace = %workspace.display(), count = found.len(), "Sensitive path scan complete");
    found
}

fn scan_env_files(workspace: &Path) -> Vec<SensitivePath> {
    let entries = match fs::read_dir(workspace) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                workspace = %workspace.display(),
                error = %e,
                "Cannot list workspace; .env files will not be masked"
            );
            return Vec::new();
        }
    };

    let mut names: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_name().to_string_lossy().starts_with(ENV_FILE_PREFIX)
                && entry
                    .file_type()
                    .map(|t| t.is_file() || t.is_symlink())
                    .unwrap_or(false)
        })
        .map(|entry| entry.file_name())
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| SensitivePath {
            host_path: workspace.join(&name),
            relative_path: PathBuf::from(name),
            kind: PathKind::File,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"SECRET=1\n").unwrap();
    }

    #[test]
    fn finds_env_files_and_git_config() {
        let ws = tempfile::tempdir().unwrap();
        touch(&ws.path().join(".env"));
        touch(&ws.path().join(".env.local"));
        touch(&ws.path().join(".git/config"));
        touch(&ws.path().join("README.md"));

        let found = scan(ws.path());
        let relative: Vec<_> = found.iter().map(|p| p.relative_path.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from(".env"),
                PathBuf::from(".env.local"),
                PathBuf::from(".git/config"),
            ]
        );
        assert!(found.iter().all(|p| p.kind == PathKind::File));
        assert_eq!(
            found[2].container_path(Path::new("/workspace")),
            PathBuf::from("/workspace/.git/config")
        );
    }

    #[test]
    fn env_prefixed_directories_are_skipped() {
        let ws = tempfile::tempdir().unwrap();
        fs::create_dir(ws.path().join(".envs")).unwrap();
        assert!(scan(ws.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn env_symlinks_are_masked() {
        let ws = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", ws.path().join(".env.prod")).unwrap();
        let found = scan(ws.path());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PathKind::File);
    }

    #[test]
    fn known_paths_keep_their_kind() {
        let ws = tempfile::tempdir().unwrap();
        fs::create_dir_all(ws.path().join(".git/credentials")).unwrap();
        touch(&ws.path().join(".git-credentials"));

        let found = scan(ws.path());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].relative_path, PathBuf::from(".git/credentials"));
        assert_eq!(found[0].kind, PathKind::Dir);
        assert_eq!(found[1].relative_path, PathBuf::from(".git-credentials"));
        assert_eq!(found[1].kind, PathKind::File);
    }

    #[test]
    fn unlistable_workspace_yields_nothing() {
        let ws = tempfile::tempdir().unwrap();
        assert!(scan(&ws.path().join("missing")).is_empty());
    }
}
