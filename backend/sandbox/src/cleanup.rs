//! Cleanup tracker for masking placeholders.
//!
//! Every placeholder lives in its own temp directory owned by a
//! [`CleanupRegistry`]. [`CleanupRegistry::release`] consumes the registry,
//! so it runs at most once; a registry dropped without being released
//! removes its directories from `Drop` instead.

use crate::error::{Result, SandboxError};
use crate::scan::PathKind;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Prefix for placeholder temp directories.
pub const PLACEHOLDER_PREFIX: &str = "devcon-mask-";

/// Name of the empty file used to mask file-kind paths.
pub const PLACEHOLDER_FILE_NAME: &str = "masked";

/// Outcome of [`CleanupRegistry::release`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub failed: usize,
}

/// Temp directories created for one invocation.
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    dirs: Vec<TempDir>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty placeholder of `kind` and return the path to mount.
    pub fn allocate(&mut self, kind: PathKind) -> Result<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix(PLACEHOLDER_PREFIX)
            .tempdir()
            .map_err(|e| SandboxError::io("create placeholder in", std::env::temp_dir(), e))?;

        let mount_source = match kind {
            PathKind::Dir => dir.path().to_path_buf(),
            PathKind::File => {
                let file = dir.path().join(PLACEHOLDER_FILE_NAME);
                File::create(&file).map_err(|e| SandboxError::io("create placeholder", &file, e))?;
                file
            }
        };

        debug!(placeholder = %mount_source.display(), "Allocated masking placeholder");
        self.dirs.push(dir);
        Ok(mount_source)
    }

    /// Registered temp directories, in allocation order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(TempDir::path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Remove every placeholder. Failures are logged and counted; the rest
    /// are still attempted.
    pub fn release(mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        for dir in self.dirs.drain(..) {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove placeholder");
                    report.failed += 1;
                }
            }
        }
        debug!(removed = report.removed, failed = report.failed, "Placeholders released");
        report
    }
}

impl Drop for CleanupRegistry {
    fn drop(&mut self) {
        if !self.dirs.is_empty() {
            warn!(
                count = self.dirs.len(),
                "Cleanup registry dropped without release; removing placeholders"
            );
        }
    }
}
