//! Container runtime handle: which executable to drive and whether it can
//! reach its daemon.

use crate::error::SandboxError;
use std::process::Stdio;
use tracing::{debug, info};

/// A docker-compatible CLI (`docker`, `podman`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRuntime {
    program: String,
}

impl ContainerRuntime {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Ask the runtime for its server version. Fails with
    /// [`SandboxError::RuntimeUnavailable`] if the CLI is missing or cannot
    /// reach its daemon.
    pub async fn ensure_available(&self) -> Result<String, SandboxError> {
        debug!(runtime = %self.program, "Probing container runtime");

        let output = tokio::process::Command::new(&self.program)
            .args(["version", "--format", "{{.Server.Version}}"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().next().unwrap_or("").trim();
            let reason = if reason.is_empty() {
                format!("`{} version` exited with {}", self.program, output.status)
            } else {
                reason.to_string()
            };
            return Err(self.unavailable(reason));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!(runtime = %self.program, version = %version, "Container runtime available");
        Ok(version)
    }

    fn unavailable(&self, reason: String) -> SandboxError {
        SandboxError::RuntimeUnavailable {
            runtime: self.program.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let runtime = ContainerRuntime::new("devcon-no-such-runtime-binary");
        let err = runtime.ensure_available().await.unwrap_err();
        match err {
            SandboxError::RuntimeUnavailable { runtime, .. } => {
                assert_eq!(runtime, "devcon-no-such-runtime-binary");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_probe_is_unavailable() {
        // `false` accepts and ignores arguments, then exits 1.
        let err = ContainerRuntime::new("false").ensure_available().await.unwrap_err();
        assert!(matches!(err, SandboxError::RuntimeUnavailable { .. }));
        assert!(err.to_string().contains("false"));
    }
}
