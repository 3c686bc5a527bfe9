//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tilestitch::compose::Background;
use tilestitch::config::ConfigFile;
use tilestitch::tile::ValidationPolicy;
use tilestitch::{ComposeConfig, ComposeOutcome};

use crate::error::CliError;

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// INI configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Compute the layout without writing the output image (zip tiles are still staged)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Canvas background (defaults to white for strips, transparent for grids)
    #[arg(long, global = true, value_enum)]
    pub background: Option<BackgroundArg>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Load the configuration file if one was given.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        match &self.config {
            Some(path) => Ok(ConfigFile::load_from(path)?),
            None => Ok(ConfigFile::default()),
        }
    }

    /// Apply background and dry-run settings to a compose config.
    pub fn apply(&self, mut compose: ComposeConfig, file: &ConfigFile) -> ComposeConfig {
        if let Some(background) = self
            .background
            .map(Background::from)
            .or(file.compose.background)
        {
            compose = compose.with_background(background);
        }
        compose.with_dry_run(self.dry_run)
    }
}

/// Filename validation selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PolicyArg {
    /// Skip files not named exactly `<x>-<y>.png`
    Strict,
    /// Keep every file; unparseable coordinates are reported as unplaced
    Lenient,
}

impl From<PolicyArg> for ValidationPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Strict => ValidationPolicy::Strict,
            PolicyArg::Lenient => ValidationPolicy::Lenient,
        }
    }
}

/// Canvas background selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BackgroundArg {
    /// Fully transparent
    Transparent,
    /// White with zero alpha
    White,
}

impl From<BackgroundArg> for Background {
    fn from(background: BackgroundArg) -> Self {
        match background {
            BackgroundArg::Transparent => Background::Transparent,
            BackgroundArg::White => Background::TransparentWhite,
        }
    }
}

/// Resolve a setting: CLI takes precedence, then config, then the default.
pub fn resolve<T>(cli: Option<T>, file: Option<T>, default: impl FnOnce() -> T) -> T {
    cli.or(file).unwrap_or_else(default)
}

/// Resolve the validation policy for grid commands.
pub fn resolve_policy(
    cli: Option<PolicyArg>,
    file: Option<ValidationPolicy>,
) -> ValidationPolicy {
    resolve(cli.map(ValidationPolicy::from), file, ValidationPolicy::default)
}

/// Print a human-readable summary of a run.
pub fn report(outcome: &ComposeOutcome) {
    match outcome {
        ComposeOutcome::Written {
            path,
            canvas,
            placed,
            unplaced,
        } => {
            println!(
                "Wrote {} ({}, {} images placed)",
                path.display(),
                canvas,
                placed
            );
            print_unplaced(unplaced);
        }
        ComposeOutcome::Planned {
            canvas,
            placed,
            unplaced,
        } => {
            println!(
                "Canvas {}, {} images placed (dry run, nothing written)",
                canvas, placed
            );
            print_unplaced(unplaced);
        }
        ComposeOutcome::Skipped(reason) => {
            println!("Nothing written: {}", reason);
        }
    }
}

fn print_unplaced(unplaced: &[tilestitch::tile::LenientTile]) {
    if unplaced.is_empty() {
        return;
    }
    println!("{} tiles have unparseable names and were not placed:", unplaced.len());
    for tile in unplaced {
        println!("  {}", tile.source.display());
    }
}
