//! Signal Relay
//!
//! Waits on a foreground child while forwarding termination signals the
//! parent receives, so the container runtime tears the container down
//! instead of leaving it orphaned.

use anyhow::{Context, Result};
use std::process::ExitStatus;
use tokio::process::Child;
use tracing::{debug, info, warn};

/// Wait for `child` to exit, forwarding SIGINT, SIGTERM, SIGHUP and SIGQUIT.
#[cfg(unix)]
pub async fn wait_with_relay(child: &mut Child) -> Result<ExitStatus> {
    use nix::sys::signal::Signal;
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
    let mut quit = signal(SignalKind::quit()).context("Failed to install SIGQUIT handler")?;

    loop {
        tokio::select! {
            status = child.wait() => {
                return status.context("Failed to wait for child process");
            }
            _ = interrupt.recv() => forward(child, Signal::SIGINT),
            _ = terminate.recv() => forward(child, Signal::SIGTERM),
            _ = hangup.recv() => forward(child, Signal::SIGHUP),
            _ = quit.recv() => forward(child, Signal::SIGQUIT),
        }
    }
}

#[cfg(unix)]
fn forward(child: &Child, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        debug!(?signal, "Child already reaped; not forwarding");
        return;
    };
    match i32::try_from(pid) {
        Ok(raw) => match kill(Pid::from_raw(raw), signal) {
            Ok(()) => info!(pid, ?signal, "Forwarded signal to child"),
            Err(e) => warn!(pid, ?signal, error = %e, "Failed to forward signal"),
        },
        Err(_) => warn!(pid, ?signal, "Child pid out of range"),
    }
}

/// Wait for `child`; on Ctrl-C, kill it and keep waiting for its exit.
#[cfg(not(unix))]
pub async fn wait_with_relay(child: &mut Child) -> Result<ExitStatus> {
    loop {
        tokio::select! {
            status = child.wait() => {
                return status.context("Failed to wait for child process");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; stopping child");
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "Failed to stop child");
                }
            }
        }
    }
}

/// Exit code to report for a finished child: its own code, or `128 + n`
/// when it was killed by signal `n`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn maps_exit_codes() {
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(7 << 8)), 7);
    }

    #[test]
    fn maps_signal_deaths() {
        // Raw wait status for "killed by SIGKILL".
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
    }

    #[tokio::test]
    async fn forwarded_signal_reaches_child() {
        let mut child = tokio::process::Command::new("/bin/sh")
            .args(["-c", "sleep 30"])
            .spawn()
            .unwrap();
        forward(&child, nix::sys::signal::Signal::SIGTERM);
        let status = child.wait().await.unwrap();
        assert_eq!(exit_code(status), 128 + 15);
    }
}
