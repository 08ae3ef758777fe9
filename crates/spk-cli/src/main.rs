//! # spk CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use spk_cli::config::{init_tracing, CliConfig};
use spk_cli::id::{run_id, IdArgs};
use spk_cli::resolve::{run_resolve, ResolveArgs};
use spk_cli::walk::{run_walk, WalkArgs};

/// Inspect object files: resolve types, walk graphs, compute ids.
#[derive(Parser, Debug)]
#[command(name = "spk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve discriminator strings against the core kit.
    Resolve(ResolveArgs),

    /// Traverse an object file and print every visited path.
    Walk(WalkArgs),

    /// Compute content-addressed object ids.
    Id(IdArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(1);
        }
    };
    if let Err(e) = init_tracing(&config, cli.verbose) {
        eprintln!("error: failed to initialize logging: {e:#}");
        return ExitCode::from(1);
    }

    tracing::debug!(?config, "spk CLI starting");

    let result = match cli.command {
        Commands::Resolve(args) => run_resolve(&args),
        Commands::Walk(args) => run_walk(&args),
        Commands::Id(args) => run_id(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
