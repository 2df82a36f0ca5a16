//! Subcommand implementations

pub mod completions;
pub mod package;
pub mod plan;

use crate::{GlobalArgs, PackArgs};
use relpak_core::{PackConfig, PackError};

/// Build the run configuration: defaults, then the config file, then
/// environment and command-line values.
pub fn load_config(global: &GlobalArgs, args: &PackArgs) -> Result<PackConfig, PackError> {
    let (config, _) = PackConfig::load(global.config.as_deref())?;
    Ok(config.overlay(args.overrides()))
}
