//! Packaging pipeline
//!
//! [`Plan::build`] runs discovery and the pure resolution stages;
//! [`package`] walks the plan in order and writes one archive per bundled
//! target.

use crate::assemble::assemble;
use crate::config::PackConfig;
use crate::discovery::SourceDiscovery;
use crate::error::PackError;
use crate::io::{ArchiveError, cleanup, write_archive, writer_for};
use crate::manifest::attach;
use crate::paths::resolve_paths;
use crate::reporter::Reporter;
use crate::resolver::{resolve_arch, resolve_archives, resolve_os};
use relpak_schema::BundledTarget;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// The resolved work of one run: every archive to write, in order.
#[derive(Debug, Clone)]
pub struct Plan {
    source_dirs: Vec<String>,
    target_count: usize,
    bundles: Vec<BundledTarget>,
    delete: bool,
}

impl Plan {
    /// Discover source directories and resolve the full plan.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Discovery`] if discovery fails and
    /// [`PackError::Path`] if a path template is invalid.
    pub fn build(config: &PackConfig, discovery: &dyn SourceDiscovery) -> Result<Self, PackError> {
        tracing::debug!("cfg: roots={:?}", config.roots);
        tracing::debug!("cfg: input={}", config.input);
        tracing::debug!("cfg: output={}", config.output);
        tracing::debug!("cfg: files={:?}", config.files);
        tracing::debug!("cfg: arch={:?}", config.arch);
        tracing::debug!("cfg: os={:?}", config.os);
        tracing::debug!("cfg: archive={:?}", config.archive);
        tracing::debug!("cfg: packages={:?}", config.packages);
        tracing::debug!("cfg: delete={}", config.delete);
        tracing::debug!("cfg: discovery={}", config.discovery);

        let source_dirs = discovery.discover(&config.source_roots())?;
        Self::from_source_dirs(config, source_dirs)
    }

    /// Resolve the plan for already-known source directories.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Path`] if a path template is invalid.
    pub fn from_source_dirs(
        config: &PackConfig,
        source_dirs: Vec<String>,
    ) -> Result<Self, PackError> {
        let targets = assemble(
            &resolve_arch(&config.arch),
            &resolve_os(&config.os),
            &resolve_archives(&config.archive),
            &config.packages,
        )
        .into_vec();

        let resolved = resolve_paths(&targets, &source_dirs, &config.input, &config.output)?;
        let bundles = attach(resolved, &config.files);

        Ok(Self {
            source_dirs,
            target_count: targets.len(),
            bundles,
            delete: config.delete,
        })
    }

    /// Source directories the plan was built from.
    pub fn source_dirs(&self) -> &[String] {
        &self.source_dirs
    }

    /// Number of distinct `os/arch/archive` targets, before pairing with
    /// source directories.
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Every archive to write, in order.
    pub fn bundles(&self) -> &[BundledTarget] {
        &self.bundles
    }

    /// Whether executables are deleted after packaging.
    pub fn delete(&self) -> bool {
        self.delete
    }
}

/// Outcome counts of a packaging run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackReport {
    /// Archives written (or planned, on a dry run).
    pub packaged: Vec<PathBuf>,
    /// Targets whose executable was missing.
    pub skipped: usize,
    /// Targets whose archive could not be written.
    pub failed: usize,
    /// Executables deleted afterwards.
    pub removed: usize,
    /// Nothing was written.
    pub dry_run: bool,
}

impl PackReport {
    /// Whether every attempted archive was written.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Write every archive in `plan`.
///
/// Targets whose executable does not exist are skipped, not failed. A
/// failure on one target is reported and the run continues. With
/// `dry_run`, nothing is written or deleted.
pub fn package(plan: &Plan, reporter: &dyn Reporter, dry_run: bool) -> PackReport {
    let started = Instant::now();
    let mut report = PackReport {
        dry_run,
        ..PackReport::default()
    };
    let mut archived_executables: Vec<PathBuf> = Vec::new();

    reporter.section(if dry_run { "Planning" } else { "Packaging" });

    for bundle in plan.bundles() {
        let target = bundle.target();
        if !cleanup::file_exists(bundle.executable()) {
            tracing::debug!("skipping {target}: {} not found", bundle.executable().display());
            reporter.skipped(target, bundle.executable());
            report.skipped += 1;
            continue;
        }

        reporter.packaging(target, bundle.archive_path());
        if dry_run {
            if writer_for(&target.archive).is_none() {
                let err = ArchiveError::UnknownFormat(target.archive.clone());
                reporter.failed(target, &err.to_string());
                report.failed += 1;
                continue;
            }
            reporter.done(target, &format!("would write {}", bundle.archive_path().display()));
            report.packaged.push(bundle.archive_path().to_path_buf());
            continue;
        }

        match write_archive(bundle.archive_path(), &target.archive, bundle.files()) {
            Ok(()) => {
                tracing::debug!("wrote {}", bundle.archive_path().display());
                reporter.done(target, &bundle.archive_path().display().to_string());
                report.packaged.push(bundle.archive_path().to_path_buf());
                archived_executables.push(bundle.executable().to_path_buf());
            }
            Err(e) => {
                tracing::debug!("failed {target}: {e}");
                reporter.failed(target, &e.to_string());
                report.failed += 1;
            }
        }
    }

    if plan.delete() {
        if dry_run {
            reporter.info("executables are kept on a dry run");
        } else {
            report.removed = remove_executables(&archived_executables, reporter);
        }
    }

    reporter.summary(&report, started.elapsed());
    report
}

/// Delete each archived executable once. Failures become warnings.
fn remove_executables(executables: &[PathBuf], reporter: &dyn Reporter) -> usize {
    let mut seen = HashSet::new();
    let mut removed = 0;
    for exe in executables {
        if !seen.insert(exe) {
            continue;
        }
        match cleanup::remove_executable(exe) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("could not remove {}: {e}", exe.display());
                reporter.warning(&format!("could not remove {}: {e}", exe.display()));
            }
        }
    }
    removed
}
