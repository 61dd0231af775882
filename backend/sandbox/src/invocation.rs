//! Invocation builder: turns a [`MountDecision`] into a container-runtime
//! command line.
//!
//! Arguments are assembled in a fixed order:
//!
//! 1. `run --rm -i [-t]`
//! 2. `--user uid:gid` when the host has numeric identities
//! 3. workspace mount, `-w`, `DEVCON_WORKSPACE` / `DEVCON_TOOL`
//! 4. home mount (if shared) and `HOME`
//! 5. writable path mounts
//! 6. masking mounts
//! 7. tool environment
//! 8. image
//! 9. tool command, then user arguments
//!
//! The runtime applies `-v` flags in order and the last mount at a path
//! wins, so masks come after every mount they may shadow.

use crate::cleanup::CleanupRegistry;
use crate::docker::ContainerRuntime;
use crate::error::{Result, SandboxError};
use crate::path::ensure_within_home;
use crate::policy::{LaunchOverrides, MountDecision};
use devcon_config::ToolDefinition;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const WORKSPACE_ENV: &str = "DEVCON_WORKSPACE";
pub const TOOL_ENV: &str = "DEVCON_TOOL";

/// Numeric user/group the container process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIdentity {
    pub uid: u32,
    pub gid: u32,
}

impl HostIdentity {
    /// Real uid/gid of this process.
    #[cfg(unix)]
    pub fn current() -> Option<Self> {
        Some(Self {
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        })
    }

    #[cfg(not(unix))]
    pub fn current() -> Option<Self> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPurpose {
    Workspace,
    Home,
    WritablePath,
    Mask,
}

/// One bind mount, in the order it is passed to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub source: PathBuf,
    pub target: PathBuf,
    pub read_only: bool,
    pub purpose: MountPurpose,
}

impl MountSpec {
    /// `-v` value: `source:target[:ro]`.
    pub fn volume_arg(&self) -> String {
        let mut arg = format!("{}:{}", self.source.display(), self.target.display());
        if self.read_only {
            arg.push_str(":ro");
        }
        arg
    }
}

/// Inputs describing one run, independent of the mount policy.
#[derive(Debug, Clone)]
pub struct InvocationRequest<'a> {
    pub tool_name: &'a str,
    pub tool: &'a ToolDefinition,
    pub tool_args: &'a [String],
    /// Host working directory mounted as the workspace.
    pub cwd: &'a Path,
    pub home_dir: &'a Path,
    pub overrides: &'a LaunchOverrides,
    pub identity: Option<HostIdentity>,
    /// Allocate a pseudo-TTY (`-t`).
    pub tty: bool,
}

/// A fully specified launch. Owns the placeholders its masks point at.
#[derive(Debug)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub mounts: Vec<MountSpec>,
    pub cleanup: CleanupRegistry,
}

#[derive(Default)]
struct ArgList {
    args: Vec<String>,
    mounts: Vec<MountSpec>,
}

impl ArgList {
    fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    fn env(&mut self, key: &str, value: impl std::fmt::Display) {
        self.push("-e");
        self.push(format!("{key}={value}"));
    }

    fn mount(&mut self, spec: MountSpec) -> Result<()> {
        bind_path(&spec.source)?;
        bind_path(&spec.target)?;
        self.push("-v");
        self.push(spec.volume_arg());
        self.mounts.push(spec);
        Ok(())
    }
}

/// `-v` takes `source:target[:ro]` as text, so a mount path must be UTF-8
/// and free of `:`.
fn bind_path(path: &Path) -> Result<&str> {
    match path.to_str() {
        Some(s) if !s.contains(':') => Ok(s),
        _ => Err(SandboxError::InvalidPath {
            path: path.display().to_string(),
            reason: "bind mount paths must be UTF-8 and must not contain ':'",
        }),
    }
}

/// Build the invocation. On error every placeholder created so far is
/// released before returning.
pub fn build(
    decision: &MountDecision,
    request: &InvocationRequest<'_>,
    runtime: &ContainerRuntime,
) -> Result<Invocation> {
    let mut cleanup = CleanupRegistry::new();
    match assemble(decision, request, &mut cleanup) {
        Ok(list) => {
            info!(
                tool = request.tool_name,
                program = %runtime.program(),
                mounts = list.mounts.len(),
                placeholders = cleanup.len(),
                "Invocation built"
            );
            Ok(Invocation {
                program: runtime.program().to_string(),
                args: list.args,
                mounts: list.mounts,
                cleanup,
            })
        }
        Err(e) => {
            cleanup.release();
            Err(e)
        }
    }
}

fn assemble(
    decision: &MountDecision,
    request: &InvocationRequest<'_>,
    cleanup: &mut CleanupRegistry,
) -> Result<ArgList> {
    let tool = request.tool;
    let workdir = PathBuf::from(tool.workdir());
    let mut list = ArgList::default();

    list.push("run");
    list.push("--rm");
    list.push("-i");
    if request.tty {
        list.push("-t");
    }

    if let Some(id) = request.identity {
        list.push("--user");
        list.push(format!("{}:{}", id.uid, id.gid));
    }

    list.mount(MountSpec {
        source: request.cwd.to_path_buf(),
        target: workdir.clone(),
        read_only: false,
        purpose: MountPurpose::Workspace,
    })?;
    list.push("-w");
    list.push(workdir.display().to_string());
    list.env(WORKSPACE_ENV, request.cwd.display());
    list.env(TOOL_ENV, request.tool_name);

    if decision.share_home {
        list.mount(MountSpec {
            source: request.home_dir.to_path_buf(),
            target: request.home_dir.to_path_buf(),
            read_only: decision.home_read_only,
            purpose: MountPurpose::Home,
        })?;
    }
    list.env("HOME", request.home_dir.display());

    if decision.mount_writable_paths {
        for writable in &decision.writable_paths {
            let host_path = &writable.host_path;
            ensure_within_home(host_path, request.home_dir).map_err(|source| {
                SandboxError::WritablePathResolutionFailed {
                    entry: writable.entry.clone(),
                    source: Box::new(source),
                }
            })?;
            prepare_writable_path(host_path)?;
            list.mount(MountSpec {
                source: host_path.clone(),
                target: host_path.clone(),
                read_only: false,
                purpose: MountPurpose::WritablePath,
            })?;
        }
    }

    for sensitive in &decision.sensitive_paths {
        let placeholder = cleanup.allocate(sensitive.kind)?;
        list.mount(MountSpec {
            source: placeholder,
            target: sensitive.container_path(&workdir),
            read_only: true,
            purpose: MountPurpose::Mask,
        })?;
    }

    for (key, value) in &tool.env {
        list.env(key, value);
    }

    let image = request.overrides.image.as_deref().unwrap_or(&tool.image);
    list.push(image);

    list.args.extend(tool.command.iter().cloned());
    list.args.extend(request.tool_args.iter().cloned());

    Ok(list)
}

/// Make sure a writable path exists on the host. Existing files and
/// directories are used as they are; a missing path becomes a directory.
fn prepare_writable_path(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path)
                .map_err(|e| SandboxError::io("create writable directory", path, e))?;
            debug!(path = %path.display(), "Created missing writable directory");
            Ok(())
        }
        Err(e) => Err(SandboxError::io("inspect writable path", path, e)),
    }
}
