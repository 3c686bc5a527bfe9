//! `zip` command: stage one zoom level from an archive and assemble it.

use std::path::PathBuf;

use clap::Args;
use tilestitch::config::{
    ConfigFile, DEFAULT_ARCHIVE, DEFAULT_GRID_OUTPUT, DEFAULT_STAGING_DIR, DEFAULT_ZOOM_LEVEL,
};
use tilestitch::ComposeConfig;

use super::common::{report, resolve, resolve_policy, GlobalArgs, PolicyArg};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ZipArgs {
    /// Zip archive holding `<zoom>/<x>-<y>.png` entries
    #[arg(short, long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    /// Zoom level to extract
    #[arg(short, long)]
    pub zoom: Option<u8>,

    /// Directory the zoom level is extracted into
    #[arg(long, value_name = "DIR")]
    pub staging: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Filename validation policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

/// Build the compose configuration for an archive run.
pub fn build(args: ZipArgs, global: &GlobalArgs, file: &ConfigFile) -> ComposeConfig {
    let archive = resolve(args.archive, file.zip.archive.clone(), || {
        PathBuf::from(DEFAULT_ARCHIVE)
    });
    let zoom_level = resolve(args.zoom, file.zip.zoom_level, || DEFAULT_ZOOM_LEVEL);
    let staging = resolve(args.staging, file.zip.staging_dir.clone(), || {
        PathBuf::from(DEFAULT_STAGING_DIR)
    });
    let output = resolve(args.output, file.zip.output.clone(), || {
        PathBuf::from(DEFAULT_GRID_OUTPUT)
    });
    let policy = resolve_policy(args.policy, file.zip.policy);

    global.apply(
        ComposeConfig::archive(archive, zoom_level, staging, output).with_policy(policy),
        file,
    )
}

pub fn run(args: ZipArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let file = global.load_config()?;
    let config = build(args, global, &file);
    let outcome = tilestitch::run(&config)?;
    report(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilestitch::SourceMode;

    #[test]
    fn test_build_defaults() {
        let args = ZipArgs {
            archive: None,
            zoom: None,
            staging: None,
            output: None,
            policy: None,
        };
        let config = build(args, &GlobalArgs::default(), &ConfigFile::default());

        assert_eq!(
            config.source,
            SourceMode::Archive {
                archive: PathBuf::from("images/tiles.zip"),
                zoom_level: 4,
                staging_dir: PathBuf::from("images"),
            }
        );
        assert_eq!(config.output, PathBuf::from("results/out.png"));
    }

    #[test]
    fn test_build_zoom_precedence() {
        let mut file = ConfigFile::default();
        file.zip.zoom_level = Some(6);

        let from_file = build(
            ZipArgs {
                archive: None,
                zoom: None,
                staging: None,
                output: None,
                policy: None,
            },
            &GlobalArgs::default(),
            &file,
        );
        assert!(matches!(
            from_file.source,
            SourceMode::Archive { zoom_level: 6, .. }
        ));

        let from_cli = build(
            ZipArgs {
                archive: None,
                zoom: Some(8),
                staging: None,
                output: None,
                policy: None,
            },
            &GlobalArgs::default(),
            &file,
        );
        assert!(matches!(
            from_cli.source,
            SourceMode::Archive { zoom_level: 8, .. }
        ));
    }
}
