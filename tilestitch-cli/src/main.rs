//! tilestitch CLI - Command-line interface
//!
//! Composites image strips and tile grids into a single PNG using the
//! tilestitch library.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::common::GlobalArgs;
use commands::{grid, strip, zip};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilestitch", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Place images side by side, left to right
    Strip(strip::StripArgs),

    /// Assemble a folder of x-y.png tiles into a grid
    Grid(grid::GridArgs),

    /// Extract one zoom level from a zip archive and assemble it into a grid
    Zip(zip::ZipArgs),
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Strip(args) => strip::run(args, &cli.global),
        Commands::Grid(args) => grid::run(args, &cli.global),
        Commands::Zip(args) => zip::run(args, &cli.global),
    }
}

fn main() {
    let cli = Cli::parse();
    tilestitch::logging::init_logging(cli.global.verbose);

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "Composite failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
