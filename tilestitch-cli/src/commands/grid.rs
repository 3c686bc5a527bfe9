//! `grid` command: assemble a folder of `x-y.png` tiles.

use std::path::PathBuf;

use clap::Args;
use tilestitch::config::{ConfigFile, DEFAULT_GRID_OUTPUT, DEFAULT_TILE_DIR};
use tilestitch::ComposeConfig;

use super::common::{report, resolve, resolve_policy, GlobalArgs, PolicyArg};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct GridArgs {
    /// Folder containing the tiles
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Filename validation policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

/// Build the compose configuration for a grid run.
pub fn build(args: GridArgs, global: &GlobalArgs, file: &ConfigFile) -> ComposeConfig {
    let dir = resolve(args.dir, file.grid.directory.clone(), || {
        PathBuf::from(DEFAULT_TILE_DIR)
    });
    let output = resolve(args.output, file.grid.output.clone(), || {
        PathBuf::from(DEFAULT_GRID_OUTPUT)
    });
    let policy = resolve_policy(args.policy, file.grid.policy);

    global.apply(ComposeConfig::grid(dir, output).with_policy(policy), file)
}

pub fn run(args: GridArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let file = global.load_config()?;
    let config = build(args, global, &file);
    let outcome = tilestitch::run(&config)?;
    report(&outcome);
    Ok(())
}
