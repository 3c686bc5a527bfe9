//! `strip` command: lay images out left to right.

use std::path::PathBuf;

use clap::Args;
use tilestitch::config::{ConfigFile, DEFAULT_STRIP_IMAGES, DEFAULT_STRIP_OUTPUT};
use tilestitch::ComposeConfig;

use super::common::{report, resolve, GlobalArgs};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct StripArgs {
    /// Images to place, in left-to-right order
    #[arg(value_name = "IMAGE")]
    pub images: Vec<PathBuf>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Build the compose configuration for a strip run.
pub fn build(args: StripArgs, global: &GlobalArgs, file: &ConfigFile) -> ComposeConfig {
    let cli_images = Some(args.images).filter(|images| !images.is_empty());
    let images = resolve(cli_images, file.strip.images.clone(), || {
        DEFAULT_STRIP_IMAGES.iter().map(PathBuf::from).collect()
    });
    let output = resolve(args.output, file.strip.output.clone(), || {
        PathBuf::from(DEFAULT_STRIP_OUTPUT)
    });

    global.apply(ComposeConfig::strip(images, output), file)
}

pub fn run(args: StripArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let file = global.load_config()?;
    let config = build(args, global, &file);
    let outcome = tilestitch::run(&config)?;
    report(&outcome);
    Ok(())
}
