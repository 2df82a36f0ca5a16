//! Reporter trait for dependency injection
//!
//! Lets the packaging pipeline report progress without being coupled to a
//! terminal implementation.

use crate::pipeline::PackReport;
use relpak_schema::Target;
use std::path::Path;
use std::time::Duration;

/// Receives progress events from [`crate::pipeline::package`].
pub trait Reporter: Send + Sync {
    /// A new phase has started (e.g. "Packaging").
    fn section(&self, title: &str);

    /// An archive is about to be written.
    fn packaging(&self, target: &Target, archive: &Path);

    /// An archive was written (or would be, on a dry run).
    fn done(&self, target: &Target, detail: &str);

    /// A target was skipped because its executable does not exist.
    fn skipped(&self, target: &Target, executable: &Path);

    /// Writing an archive failed.
    fn failed(&self, target: &Target, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Display the final counts.
    fn summary(&self, report: &PackReport, elapsed: Duration);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn packaging(&self, target: &Target, archive: &Path) {
        (**self).packaging(target, archive);
    }
    fn done(&self, target: &Target, detail: &str) {
        (**self).done(target, detail);
    }
    fn skipped(&self, target: &Target, executable: &Path) {
        (**self).skipped(target, executable);
    }
    fn failed(&self, target: &Target, reason: &str) {
        (**self).failed(target, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn summary(&self, report: &PackReport, elapsed: Duration) {
        (**self).summary(report, elapsed);
    }
}

/// A no-op reporter for silent runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn packaging(&self, _: &Target, _: &Path) {}
    fn done(&self, _: &Target, _: &str) {}
    fn skipped(&self, _: &Target, _: &Path) {}
    fn failed(&self, _: &Target, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: &PackReport, _: Duration) {}
}
