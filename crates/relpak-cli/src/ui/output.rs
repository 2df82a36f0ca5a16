//! Terminal reporter for packaging runs.
//!
//! Every line is written while holding the stdout lock, so lines never
//! interleave.

use super::theme::{Theme, format_elapsed, plural};
use crossterm::style::Stylize;
use relpak_core::{PackReport, Reporter};
use relpak_schema::Target;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// Writes progress and results to stdout.
#[derive(Debug, Clone, Default)]
pub struct Output {
    theme: Theme,
    quiet: bool,
    verbose: bool,
}

impl Output {
    /// `quiet` hides everything except failures and warnings; `verbose`
    /// also lists skipped targets.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            theme: Theme::default(),
            quiet,
            verbose,
        }
    }

    fn target_cell(&self, target: &Target) -> String {
        format!(
            "{:<width$}",
            target.to_string(),
            width = self.theme.layout.target_width
        )
    }

    /// Prints an informational message.
    pub fn info(&self, msg: &str) {
        if self.quiet {
            return;
        }
        write_line(&format!("{} {msg}", self.theme.icons.info.with(self.theme.colors.secondary)));
    }

    /// Prints a warning message.
    pub fn warning(&self, msg: &str) {
        write_line(&format!(
            "{} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg.with(self.theme.colors.warning)
        ));
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        write_line("");
        write_line(&title.with(self.theme.colors.header).bold().to_string());
    }

    fn packaging(&self, target: &Target, archive: &Path) {
        if self.verbose && !self.quiet {
            write_line(&format!(
                "  {} {}",
                self.target_cell(target).with(self.theme.colors.secondary),
                archive.display().to_string().with(self.theme.colors.secondary)
            ));
        }
    }

    fn done(&self, target: &Target, detail: &str) {
        if self.quiet {
            return;
        }
        write_line(&format!(
            "{} {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            self.target_cell(target).with(self.theme.colors.target),
            detail.with(self.theme.colors.secondary)
        ));
    }

    fn skipped(&self, target: &Target, executable: &Path) {
        if self.verbose && !self.quiet {
            write_line(&format!(
                "{} {} {}",
                self.theme.icons.pending.with(self.theme.colors.secondary),
                self.target_cell(target).with(self.theme.colors.secondary),
                format!("{} not found", executable.display()).with(self.theme.colors.secondary)
            ));
        }
    }

    fn failed(&self, target: &Target, reason: &str) {
        write_line(&format!(
            "{} {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            self.target_cell(target).with(self.theme.colors.target),
            reason.with(self.theme.colors.error)
        ));
    }

    fn info(&self, msg: &str) {
        Output::info(self, msg);
    }

    fn warning(&self, msg: &str) {
        Output::warning(self, msg);
    }

    fn summary(&self, report: &PackReport, elapsed: Duration) {
        if self.quiet && report.is_success() {
            return;
        }

        let verb = if report.dry_run { "planned" } else { "written" };
        let mut parts = vec![format!("{} {verb}", plural(report.packaged.len(), "archive"))];
        if report.skipped > 0 {
            parts.push(format!("{} skipped", report.skipped));
        }
        if report.failed > 0 {
            parts.push(format!("{} failed", report.failed));
        }
        if report.removed > 0 {
            parts.push(format!("{} removed", plural(report.removed, "executable")));
        }
        let text = format!("{} in {}", parts.join(", "), format_elapsed(elapsed));

        write_line("");
        if report.is_success() {
            write_line(&format!(
                "{} {}",
                self.theme.icons.success.with(self.theme.colors.success),
                text
            ));
        } else {
            write_line(&format!(
                "{} {}",
                self.theme.icons.error.with(self.theme.colors.error),
                text.with(self.theme.colors.error)
            ));
        }
    }
}

fn write_line(text: &str) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{text}");
}
