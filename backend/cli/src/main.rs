mod check_cmd;
mod dry_run;
mod list_cmd;
mod run_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use devcon_config::{tools_file_path, EnvDefaults, ToolRegistry};
use devcon_sandbox::{ContainerRuntime, LaunchOverrides};

use run_cmd::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "devcon")]
#[command(about = "Run CLI agents in disposable, permission-constrained containers")]
#[command(version)]
struct Cli {
    /// Print the container command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Image to run instead of the tool's own
    #[arg(long, value_name = "IMAGE")]
    image: Option<String>,

    /// Mount the home directory into the container
    #[arg(long, conflicts_with = "no_share_home")]
    share_home: bool,

    /// Do not mount the home directory
    #[arg(long)]
    no_share_home: bool,

    /// Tools file to merge over the built-in definitions
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Container runtime executable (docker, podman, ...)
    #[arg(long, value_name = "PROGRAM")]
    runtime: Option<String>,

    /// List available tools and exit
    #[arg(long, conflicts_with_all = ["check", "command"])]
    list: bool,

    /// Check that the container runtime is reachable and show defaults
    #[arg(long, conflicts_with = "command")]
    check: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tool to launch, followed by arguments passed to it verbatim
    #[arg(
        value_name = "TOOL [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present_any = ["list", "check"]
    )]
    command: Vec<String>,
}

impl Cli {
    /// Tri-state home override: `None` unless one of the flags was given.
    fn share_home_override(&self) -> Option<bool> {
        match (self.share_home, self.no_share_home) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let defaults = EnvDefaults::from_env();

    let level = if cli.verbose { "debug" } else { defaults.log_level.as_str() };
    devcon_logging::init_logger(level, defaults.log_dir.as_deref());
    defaults.log_warnings();

    match run(cli, defaults).await {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            terminal_output::note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut defaults: EnvDefaults) -> Result<i32> {
    if let Some(runtime) = &cli.runtime {
        defaults.runtime = runtime.clone();
    }
    if let Some(config) = &cli.config {
        defaults.tools_file = Some(config.clone());
    }
    debug!(?defaults, "Effective defaults");

    let runtime = ContainerRuntime::new(defaults.runtime.clone());
    let tools_file = tools_file_path(&defaults);

    if cli.check {
        return check_cmd::run(&runtime, &defaults, &tools_file).await;
    }

    let registry = ToolRegistry::load(&tools_file).await?;

    if cli.list {
        list_cmd::run(&registry);
        return Ok(0);
    }

    let overrides = LaunchOverrides {
        share_home: cli.share_home_override(),
        image: cli.image,
    };
    let mut command = cli.command.into_iter();
    let tool = command.next().unwrap_or_default();
    let options = RunOptions {
        tool,
        tool_args: command.collect(),
        dry_run: cli.dry_run,
        overrides,
    };

    run_cmd::run(options, &registry, &defaults, &runtime).await
}
