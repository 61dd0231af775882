//! `devcon --check`: runtime reachability and effective defaults.

use std::path::Path;

use anyhow::Result;

use devcon_config::EnvDefaults;
use devcon_sandbox::ContainerRuntime;

use crate::terminal_output::{note_detail, note_status};

/// Returns 0 when the runtime answered, 1 otherwise.
pub async fn run(
    runtime: &ContainerRuntime,
    defaults: &EnvDefaults,
    tools_file: &Path,
) -> Result<i32> {
    println!("Container runtime:");
    let ok = match runtime.ensure_available().await {
        Ok(version) => {
            note_status(true, &format!("{} (server {version})", runtime.program()));
            true
        }
        Err(e) => {
            note_status(false, &e.to_string());
            false
        }
    };

    println!("Defaults:");
    note_detail("share home:", &defaults.share_home.to_string());
    note_detail("read-only home:", &defaults.home_read_only.to_string());
    note_detail("runtime:", &defaults.runtime);
    let file_state = if tools_file.exists() { "" } else { " (not present)" };
    note_detail("tools file:", &format!("{}{file_state}", tools_file.display()));

    Ok(if ok { 0 } else { 1 })
}
