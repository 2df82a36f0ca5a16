//! Package command

use anyhow::{Context, Result};
use relpak_core::Plan;

use crate::ui::Output;
use crate::{GlobalArgs, PackArgs};

/// Resolve the plan and write every archive.
///
/// Per-target failures are reported but do not fail the command.
pub fn package(global: &GlobalArgs, args: &PackArgs) -> Result<()> {
    let config = super::load_config(global, args)?;
    let discovery = config.discovery.strategy();
    let plan = Plan::build(&config, discovery.as_ref()).context("Failed to resolve packages")?;

    let output = Output::new(global.quiet, global.debug);
    if plan.bundles().is_empty() {
        output.info("Nothing to package");
        return Ok(());
    }

    relpak_core::package(&plan, &output, global.dry_run);
    Ok(())
}
