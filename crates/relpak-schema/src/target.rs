//! Package targets and the `os/arch/archive` triple syntax.

use crate::format::ArchiveFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix that turns a value or triple into an exclusion.
pub const NEGATION_MARKER: char = '!';

/// Separator between the fields of a triple.
pub const TRIPLE_SEPARATOR: char = '/';

/// Errors produced when parsing an `os/arch/archive` triple.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    /// The input did not split into exactly three segments.
    #[error("expected os/arch/archive, found {found} segment(s) in '{input}'")]
    SegmentCount {
        /// The rejected input.
        input: String,
        /// How many `/`-separated segments it had.
        found: usize,
    },

    /// One of the three segments was empty.
    #[error("empty segment in '{input}'")]
    EmptySegment {
        /// The rejected input.
        input: String,
    },
}

/// One OS/architecture/archive-format combination to package.
///
/// Values keep whatever spelling they were given; comparisons that decide
/// identity go through [`Target::key`], which is case-insensitive.
///
/// # Example
///
/// ```
/// use relpak_schema::Target;
///
/// let target: Target = "linux/amd64/tar.xz".parse().unwrap();
/// assert_eq!(target.arch, "amd64");
/// assert_eq!(target.to_string(), "linux/amd64/tar.xz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Operating system, e.g. `linux`.
    pub os: String,
    /// Architecture, e.g. `amd64`.
    pub arch: String,
    /// Archive format as spelled by the user, e.g. `tgz`.
    pub archive: String,
}

impl Target {
    /// Create a target from its three fields.
    pub fn new(os: impl Into<String>, arch: impl Into<String>, archive: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
            archive: archive.into(),
        }
    }

    /// Case-insensitive identity of this target.
    pub fn key(&self) -> TargetKey {
        TargetKey(format!(
            "{}{TRIPLE_SEPARATOR}{}{TRIPLE_SEPARATOR}{}",
            self.os.to_lowercase(),
            self.arch.to_lowercase(),
            self.archive.to_lowercase()
        ))
    }

    /// The archive format this target names, if it is a known one.
    pub fn format(&self) -> Option<ArchiveFormat> {
        ArchiveFormat::from_name(&self.archive)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{TRIPLE_SEPARATOR}{}{TRIPLE_SEPARATOR}{}",
            self.os, self.arch, self.archive
        )
    }
}

/// Parses `os/arch/archive`. Anything other than exactly three segments is
/// rejected, and so is a triple with an empty segment such as `linux//zip`.
impl std::str::FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(TRIPLE_SEPARATOR).collect();
        let [os, arch, archive] = parts.as_slice() else {
            return Err(TargetParseError::SegmentCount {
                input: s.to_string(),
                found: parts.len(),
            });
        };
        if os.is_empty() || arch.is_empty() || archive.is_empty() {
            return Err(TargetParseError::EmptySegment {
                input: s.to_string(),
            });
        }
        Ok(Self::new(*os, *arch, *archive))
    }
}

/// Lowercased `os/arch/archive` string used to deduplicate targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetKey(String);

impl TargetKey {
    /// The lowercased triple.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully qualified triple given by the user to force a target in or out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitEntry {
    /// The triple the entry refers to.
    pub target: Target,
    /// `true` when the entry was written as `!os/arch/archive`.
    pub negated: bool,
}

impl std::fmt::Display for ExplicitEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "{NEGATION_MARKER}")?;
        }
        write!(f, "{}", self.target)
    }
}

impl std::str::FromStr for ExplicitEntry {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negated, triple) = match s.strip_prefix(NEGATION_MARKER) {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        Ok(Self {
            target: triple.parse()?,
            negated,
        })
    }
}

/// A target bound to one source directory, with both paths rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// The triple this record was expanded from.
    #[serde(flatten)]
    pub target: Target,
    /// Base name of the source directory.
    pub dir: String,
    /// Where the built executable is read from.
    pub executable: PathBuf,
    /// Where the archive is written.
    pub archive_path: PathBuf,
}

impl ResolvedTarget {
    /// Create a resolved target.
    pub fn new(
        target: Target,
        dir: impl Into<String>,
        executable: impl Into<PathBuf>,
        archive_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target,
            dir: dir.into(),
            executable: executable.into(),
            archive_path: archive_path.into(),
        }
    }
}

/// A resolved target together with the files that go into its archive.
///
/// The manifest always starts with the executable; it cannot be edited once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundledTarget {
    #[serde(flatten)]
    resolved: ResolvedTarget,
    files: Vec<PathBuf>,
}

impl BundledTarget {
    /// Build the manifest: the executable followed by `extra` in order.
    pub fn new(resolved: ResolvedTarget, extra: &[PathBuf]) -> Self {
        let mut files = Vec::with_capacity(extra.len() + 1);
        files.push(resolved.executable.clone());
        files.extend_from_slice(extra);
        Self { resolved, files }
    }

    /// The triple being packaged.
    pub fn target(&self) -> &Target {
        &self.resolved.target
    }

    /// The path-resolved record this bundle was built from.
    pub fn resolved(&self) -> &ResolvedTarget {
        &self.resolved
    }

    /// Executable path (the first manifest entry).
    pub fn executable(&self) -> &Path {
        &self.resolved.executable
    }

    /// Output archive path.
    pub fn archive_path(&self) -> &Path {
        &self.resolved.archive_path
    }

    /// Ordered manifest, executable first.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}
