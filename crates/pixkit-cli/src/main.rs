//! pixkit - scriptable image manipulation
//!
//! Drives the pixkit command engine from script files, single commands or
//! an interactive shell.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixkit")]
#[command(author, version, about = "Scriptable image manipulation")]
#[command(long_about = "
Runs named image commands against an in-memory store of images and
histograms. Images enter with `load` and leave with `save`.

Examples:
  pixkit run edit.pk                          # Run a script
  pixkit exec brighten 20 in out              # One command (empty store)
  pixkit shell                                # Interactive prompt
  pixkit commands                             # List commands and signatures

Script lines:
  load photo.png img
  blur img soft split=50
  partial-process img soft out maskimg=mask
  save out result.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run script files in order, sharing one image store
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Run a single command
    #[command(visible_alias = "x")]
    Exec(ExecArgs),

    /// Read commands from stdin until EOF or `quit`
    Shell,

    /// List registered commands
    #[command(visible_alias = "ls")]
    Commands,
}

/// Arguments for the `run` command.
#[derive(Args)]
struct RunArgs {
    /// Script files
    #[arg(required = true)]
    scripts: Vec<PathBuf>,
}

/// Arguments for the `exec` command.
#[derive(Args)]
struct ExecArgs {
    /// Command name
    command: String,

    /// Command arguments (`key=value` for keywords)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_ref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Run(args) => commands::script::run(&args.scripts),
        Commands::Exec(args) => commands::script::exec(&args.command, &args.args),
        Commands::Shell => commands::shell::run(),
        Commands::Commands => commands::list::run(cli.verbose),
    }
}

/// Installs the global subscriber; keep the guard alive to flush file logs.
fn init_logging(
    verbose: u8,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
