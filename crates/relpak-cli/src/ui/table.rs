//! Plan listing
//!
//! Column-aligned rendering for `relpak plan`.

use super::theme::{Theme, plural};
use crossterm::style::{StyledContent, Stylize};
use relpak_core::Plan;
use relpak_core::io::file_exists;
use relpak_schema::BundledTarget;

/// Print every planned archive, one row per bundled target.
pub fn print_plan(plan: &Plan) {
    let theme = Theme::default();

    println!("{}", header(&theme));
    let mut ready = 0;
    for bundle in plan.bundles() {
        let present = file_exists(bundle.executable());
        if present {
            ready += 1;
        }
        println!("{}", row(&theme, bundle, present));
    }

    println!();
    let footer = format!(
        "  {} from {} across {}, {} ready",
        plural(plan.bundles().len(), "archive"),
        plural(plan.target_count(), "target"),
        plural(plan.source_dirs().len(), "source dir"),
        ready
    );
    println!("{}", footer.with(theme.colors.header));
}

fn header(theme: &Theme) -> StyledContent<String> {
    let text = format!(
        "  {:<tw$} {:<dw$} {:<32} {}",
        "target",
        "dir",
        "executable",
        "archive",
        tw = theme.layout.target_width,
        dw = theme.layout.dir_width,
    );
    text.with(theme.colors.header)
}

fn row(theme: &Theme, bundle: &BundledTarget, present: bool) -> String {
    let icon = if present {
        theme.icons.success.with(theme.colors.success)
    } else {
        theme.icons.pending.with(theme.colors.secondary)
    };
    let target = format!(
        "{:<width$}",
        bundle.target().to_string(),
        width = theme.layout.target_width
    );
    let dir = format!(
        "{:<width$}",
        bundle.resolved().dir,
        width = theme.layout.dir_width
    );
    let executable = format!("{:<32}", bundle.executable().display().to_string());

    format!(
        "{} {} {} {} {}",
        icon,
        target.with(theme.colors.target),
        dir.with(theme.colors.secondary),
        executable.with(theme.colors.secondary),
        bundle.archive_path().display()
    )
}
