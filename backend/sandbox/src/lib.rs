//! `devcon-sandbox`: builds container invocations for untrusted CLI agents.
//!
//! Path resolution, sensitive path scanning, mount policy, invocation
//! assembly and placeholder cleanup.

pub mod cleanup;
pub mod docker;
pub mod error;
pub mod invocation;
pub mod path;
pub mod policy;
pub mod scan;

pub use cleanup::{CleanupRegistry, CleanupReport};
pub use docker::ContainerRuntime;
pub use error::SandboxError;
pub use invocation::{build, HostIdentity, Invocation, InvocationRequest, MountPurpose, MountSpec};
pub use path::{ensure_within_home, resolve};
pub use policy::{
    decide, merge_override, LaunchOverrides, MountDecision, PolicyWarning, WritablePath,
};
pub use scan::{scan, PathKind, SensitivePath};
