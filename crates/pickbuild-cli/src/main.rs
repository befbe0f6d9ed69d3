//! pickbuild - clone, pick a branch, install, build
//!
//! ## Commands
//!
//! - `run <repository>`: clone the repository (or, with `--skip-clone`, use the
//!   current directory), pick a remote branch, check it out, install
//!   dependencies and run a chosen `package.json` script
//! - `build [repository]`: the same pipeline from inside an existing clone
//!
//! Steps:
//!
//! 1. git clone repository
//! 2. list remote branches
//! 3. choose your branch
//! 4. git checkout branch
//! 5. install dependencies (optional)
//! 6. list package.json scripts
//! 7. choose your build script
//! 8. run build script

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pickbuild_core::config::{ENV_INSTALL, ENV_PACKAGE_MANAGER};
use pickbuild_core::{
    init_tracing, BuildPipeline, ConsoleReporter, InstallPolicy, PipelineConfig, PipelineReport,
    PipelineRequest, ProgressIndicator, Reporter, ShellRunner, SilentProgress, Spinner,
    TerminalPrompter,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "pickbuild")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clone a repository, pick a branch, install dependencies and run a build script", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Package manager binary [default: npm]
    #[arg(long, global = true, env = ENV_PACKAGE_MANAGER)]
    package_manager: Option<String>,

    /// Dependency install: ask, run or skip [default: ask]
    #[arg(long, global = true, env = ENV_INSTALL)]
    install: Option<InstallPolicy>,

    /// Do not draw the progress spinner
    #[arg(long, global = true)]
    no_spinner: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone a repository and build a branch of it
    Run {
        /// git repository locator (ssh or https URL, or a local path)
        repository: String,

        /// Skip git clone; the current directory must be the repository
        #[arg(long)]
        skip_clone: bool,
    },

    /// Build a branch of the repository in the current directory
    Build {
        /// Expected repository; checked against the current directory name
        repository: Option<String>,
    },
}

impl Commands {
    fn request(&self) -> PipelineRequest {
        match self {
            Commands::Run {
                repository,
                skip_clone: false,
            } => PipelineRequest::clone_from(repository.clone()),
            Commands::Run {
                repository,
                skip_clone: true,
            } => PipelineRequest::in_place(Some(repository.clone())),
            Commands::Build { repository } => PipelineRequest::in_place(repository.clone()),
        }
    }
}

/// Environment configuration with command-line overrides applied.
fn load_config(cli: &Cli, base_dir: PathBuf) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env()
        .map_err(|e| anyhow!(e))
        .context("Invalid pickbuild environment")?
        .with_base_dir(base_dir);

    if let Some(pm) = &cli.package_manager {
        config = config.with_package_manager(pm.clone());
    }
    if let Some(policy) = cli.install {
        config = config.with_install_policy(policy);
    }

    Ok(config)
}

fn banner(report: &PipelineReport) -> String {
    format!(
        "All Done: {} built with `{}` in {} ({} ms)",
        report.branch,
        report.build_command,
        report.working_dir.display(),
        report.duration_ms
    )
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.json, level);

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = load_config(&cli, cwd)?;
    debug!(?config, "Loaded configuration");

    let progress: Arc<dyn ProgressIndicator> = if cli.no_spinner || !std::io::stderr().is_terminal()
    {
        Arc::new(SilentProgress)
    } else {
        Arc::new(Spinner::new())
    };
    let reporter = Arc::new(ConsoleReporter);

    let pipeline = BuildPipeline::new(config, Arc::new(ShellRunner), Arc::new(TerminalPrompter::new()))
        .with_progress(progress)
        .with_reporter(reporter.clone());

    match pipeline.run(&cli.command.request()).await {
        Ok(report) => {
            reporter.info(&banner(&report));
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            reporter.error(&format!("\nerror: {}", failure));
            Ok(ExitCode::FAILURE)
        }
    }
}
