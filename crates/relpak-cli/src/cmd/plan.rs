//! Plan command

use anyhow::{Context, Result};
use relpak_core::Plan;

use crate::ui::table;
use crate::{GlobalArgs, PackArgs};

/// Print the resolved targets without writing anything.
pub fn plan(global: &GlobalArgs, args: &PackArgs, json: bool) -> Result<()> {
    let config = super::load_config(global, args)?;
    let discovery = config.discovery.strategy();
    let plan = Plan::build(&config, discovery.as_ref()).context("Failed to resolve packages")?;

    if json {
        let rendered =
            serde_json::to_string_pretty(plan.bundles()).context("Failed to serialize plan")?;
        println!("{rendered}");
    } else {
        table::print_plan(&plan);
    }
    Ok(())
}
