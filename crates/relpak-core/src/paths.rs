//! Input and output path resolution
//!
//! Every target is paired with every source directory, and both path
//! templates are rendered for each pair.

use crate::error::{PathError, TemplateRole};
use crate::template::{PathTemplate, TemplateValues};
use relpak_schema::{ResolvedTarget, Target};
use std::path::{Path, PathBuf};

/// Directory name used when a path has no final component.
const CURRENT_DIR: &str = ".";

/// Base name of a source directory: its last component after trailing
/// separators are trimmed, or `.` when there is none.
pub fn source_dir_name(dir: &str) -> String {
    let trimmed = dir.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    Path::new(trimmed)
        .file_name()
        .map_or_else(|| CURRENT_DIR.to_string(), |name| name.to_string_lossy().into_owned())
}

/// Expand `targets × source_dirs` into resolved targets.
///
/// Targets form the outer loop and source directories the inner one. Both
/// templates are parsed once up front.
///
/// # Errors
///
/// Returns a [`PathError`] naming the template that failed to parse. No
/// partial result is returned.
pub fn resolve_paths<S: AsRef<str>>(
    targets: &[Target],
    source_dirs: &[S],
    input_template: &str,
    output_template: &str,
) -> Result<Vec<ResolvedTarget>, PathError> {
    let input = PathTemplate::parse(input_template)
        .map_err(|e| PathError::new(TemplateRole::Input, e))?;
    let output = PathTemplate::parse(output_template)
        .map_err(|e| PathError::new(TemplateRole::Output, e))?;

    let dir_names: Vec<String> = source_dirs
        .iter()
        .map(|dir| source_dir_name(dir.as_ref()))
        .collect();

    let mut resolved = Vec::with_capacity(targets.len() * dir_names.len());
    for target in targets {
        for dir in &dir_names {
            let values = TemplateValues {
                dir,
                os: &target.os,
                arch: &target.arch,
                archive: &target.archive,
            };
            let executable = PathBuf::from(input.render(&values));
            let archive_path = PathBuf::from(output.render(&values));
            resolved.push(ResolvedTarget::new(
                target.clone(),
                dir.as_str(),
                executable,
                archive_path,
            ));
        }
    }

    tracing::debug!(
        "resolved paths for {} target(s) across {} source dir(s)",
        targets.len(),
        dir_names.len()
    );
    Ok(resolved)
}
