//! Launch one tool: lookup, runtime probe, mount policy, invocation,
//! launch or dry-run, cleanup.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use devcon_config::{EnvDefaults, ToolRegistry};
use devcon_logging::redact_command_line;
use devcon_sandbox::{
    build, decide, ContainerRuntime, HostIdentity, Invocation, InvocationRequest, LaunchOverrides,
    SandboxError,
};

use crate::dry_run::render_command;

/// Options for a single launch, as parsed from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub tool: String,
    pub tool_args: Vec<String>,
    pub dry_run: bool,
    pub overrides: LaunchOverrides,
}

/// Returns the exit code devcon should exit with.
pub async fn run(
    options: RunOptions,
    registry: &ToolRegistry,
    defaults: &EnvDefaults,
    runtime: &ContainerRuntime,
) -> Result<i32> {
    let home = dirs::home_dir().context("Cannot determine home directory")?;
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    run_in(options, registry, defaults, runtime, &home, &cwd).await
}

/// [`run`] with explicit home and workspace directories.
async fn run_in(
    options: RunOptions,
    registry: &ToolRegistry,
    defaults: &EnvDefaults,
    runtime: &ContainerRuntime,
    home: &Path,
    cwd: &Path,
) -> Result<i32> {
    let tool = registry
        .get(&options.tool)
        .ok_or_else(|| SandboxError::UnknownTool(options.tool.clone()))?;

    if !options.dry_run {
        runtime.ensure_available().await?;
    }

    let invocation = prepare(&options, tool, defaults, runtime, home, cwd)?;
    debug!(
        command = %redact_command_line(&invocation.program, &invocation.args),
        "Assembled container command"
    );

    let Invocation {
        program,
        args,
        cleanup,
        ..
    } = invocation;

    if options.dry_run {
        println!("{}", render_command(&program, &args));
        cleanup.release();
        return Ok(0);
    }

    info!(tool = %options.tool, "Launching container");
    let result = devcon_supervisor::launch(&program, &args).await;
    cleanup.release();
    result
}

fn prepare(
    options: &RunOptions,
    tool: &devcon_config::ToolDefinition,
    defaults: &EnvDefaults,
    runtime: &ContainerRuntime,
    home: &Path,
    cwd: &Path,
) -> Result<Invocation, SandboxError> {
    let decision = decide(tool, &options.overrides, defaults, home, cwd)?;
    let request = InvocationRequest {
        tool_name: &options.tool,
        tool,
        tool_args: &options.tool_args,
        cwd,
        home_dir: home,
        overrides: &options.overrides,
        identity: HostIdentity::current(),
        tty: std::io::stdin().is_terminal(),
    };
    build(&decision, &request, runtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn unknown_tool_fails_before_probing_runtime() {
        let options = RunOptions {
            tool: "nope".to_string(),
            tool_args: Vec::new(),
            dry_run: false,
            overrides: LaunchOverrides::default(),
        };
        let runtime = ContainerRuntime::new("devcon-no-such-runtime-binary");
        let err = run(options, &ToolRegistry::builtin(), &EnvDefaults::default(), &runtime)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SandboxError>(),
            Some(SandboxError::UnknownTool(name)) if name == "nope"
        ));
    }

    #[tokio::test]
    async fn unreachable_runtime_is_fatal() {
        let options = RunOptions {
            tool: "shell".to_string(),
            tool_args: Vec::new(),
            dry_run: false,
            overrides: LaunchOverrides::default(),
        };
        let runtime = ContainerRuntime::new("devcon-no-such-runtime-binary");
        let err = run(options, &ToolRegistry::builtin(), &EnvDefaults::default(), &runtime)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SandboxError>(),
            Some(SandboxError::RuntimeUnavailable { .. })
        ));
    }

    /// Mask sources named in a recorded `-v` argument list.
    fn mask_sources(recorded: &str) -> Vec<PathBuf> {
        let lines: Vec<&str> = recorded.lines().collect();
        lines
            .windows(2)
            .filter(|w| w[0] == "-v" && w[1].ends_with(":ro") && w[1].contains("/workspace/"))
            .filter_map(|w| w[1].split(':').next().map(PathBuf::from))
            .collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn placeholders_are_removed_when_the_container_fails() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let ws = tempfile::tempdir().unwrap();
        std::fs::write(ws.path().join(".env"), "TOKEN=1").unwrap();
        std::fs::write(ws.path().join(".env.local"), "TOKEN=2").unwrap();

        let record = bin.path().join("args");
        let script = bin.path().join("fake-runtime");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 if [ \"$1\" = version ]; then echo 24.0.0; exit 0; fi\n\
                 printf '%s\\n' \"$@\" > '{}'\n\
                 exit 7\n",
                record.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let options = RunOptions {
            tool: "shell".to_string(),
            tool_args: Vec::new(),
            dry_run: false,
            overrides: LaunchOverrides::default(),
        };
        let runtime = ContainerRuntime::new(script.display().to_string());
        let code = run_in(
            options,
            &ToolRegistry::builtin(),
            &EnvDefaults::default(),
            &runtime,
            home.path(),
            ws.path(),
        )
        .await
        .unwrap();
        assert_eq!(code, 7);

        let recorded = std::fs::read_to_string(&record).unwrap();
        let sources = mask_sources(&recorded);
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().all(|p| !p.exists()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn placeholders_are_removed_when_launch_fails() {
        let home = tempfile::tempdir().unwrap();
        let ws = tempfile::tempdir().unwrap();
        std::fs::write(ws.path().join(".env"), "TOKEN=1").unwrap();
        let options = RunOptions {
            tool: "shell".to_string(),
            tool_args: Vec::new(),
            dry_run: true,
            overrides: LaunchOverrides::default(),
        };
        let registry = ToolRegistry::builtin();
        let tool = registry.get("shell").unwrap();
        let runtime = ContainerRuntime::new("devcon-no-such-runtime-binary");
        let invocation = prepare(
            &options,
            tool,
            &EnvDefaults::default(),
            &runtime,
            home.path(),
            ws.path(),
        )
        .unwrap();
        let placeholders: Vec<_> = invocation.cleanup.paths().map(Path::to_path_buf).collect();
        assert_eq!(placeholders.len(), 1);

        let Invocation {
            program,
            args,
            cleanup,
            ..
        } = invocation;
        assert!(devcon_supervisor::launch(&program, &args).await.is_err());
        cleanup.release();
        assert!(placeholders.iter().all(|p| !p.exists()));
    }

    #[test]
    fn prepare_uses_explicit_home_and_workspace() {
        let home = tempfile::tempdir().unwrap();
        let ws = tempfile::tempdir().unwrap();
        std::fs::write(ws.path().join(".env"), "X=1").unwrap();
        let options = RunOptions {
            tool: "codex".to_string(),
            tool_args: vec!["exec".to_string()],
            dry_run: true,
            overrides: LaunchOverrides::default(),
        };
        let registry = ToolRegistry::builtin();
        let tool = registry.get("codex").unwrap();
        let invocation = prepare(
            &options,
            tool,
            &EnvDefaults::default(),
            &ContainerRuntime::new("podman"),
            home.path(),
            ws.path(),
        )
        .unwrap();

        assert_eq!(invocation.program, "podman");
        assert!(home.path().join(".codex").is_dir());
        assert_eq!(invocation.args.last().unwrap(), "exec");
        assert_eq!(invocation.cleanup.len(), 1);
        let placeholders: Vec<_> = invocation.cleanup.paths().map(Path::to_path_buf).collect();
        invocation.cleanup.release();
        assert!(placeholders.iter().all(|p| !p.exists()));
    }
}
