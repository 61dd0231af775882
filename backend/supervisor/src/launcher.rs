//! Foreground process launcher.

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::relay::{exit_code, wait_with_relay};

/// Run `program` with `args` attached to this terminal and return the exit
/// code it should be forwarded as.
pub async fn launch(program: &str, args: &[String]) -> Result<i32> {
    debug!(program, argc = args.len(), "Spawning child process");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("Failed to start {program}"))?;

    let pid = child.id();
    info!(program, pid = ?pid, "Child started");

    let status = wait_with_relay(&mut child).await?;
    let code = exit_code(status);
    info!(program, code, "Child exited");
    Ok(code)
}
