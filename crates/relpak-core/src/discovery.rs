//! Source directory discovery
//!
//! Decides which program directories to package. The default asks the Go
//! toolchain for every `main` package under the given roots; the plain
//! directory strategy takes the roots as they are.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Template handed to `go list`: package name and import path.
const GO_LIST_FORMAT: &str = "{{.Name}}|{{.ImportPath}}";

/// Package name of Go programs.
const GO_MAIN_PACKAGE: &str = "main";

/// Errors raised while discovering source directories.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The `go` executable is not on `PATH`.
    #[error("'{0}' not found on PATH")]
    ToolchainMissing(String),

    /// The toolchain could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The toolchain exited with a failure status.
    #[error("{command} failed ({status}):\n{stderr}")]
    CommandFailed {
        /// Command line that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A root given to directory discovery is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Strategy for finding the directories to package.
pub trait SourceDiscovery {
    /// Return the source directories under `roots`, in a stable order.
    ///
    /// # Errors
    ///
    /// Any failure is fatal to the run.
    fn discover(&self, roots: &[String]) -> Result<Vec<String>, DiscoveryError>;
}

/// Which [`SourceDiscovery`] implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryKind {
    /// Ask `go list` for `main` packages.
    #[default]
    #[serde(rename = "go")]
    Go,
    /// Use the roots themselves as source directories.
    #[serde(rename = "dirs")]
    Directories,
}

impl DiscoveryKind {
    /// Name used in flags and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Directories => "dirs",
        }
    }

    /// Build the matching strategy.
    pub fn strategy(self) -> Box<dyn SourceDiscovery> {
        match self {
            Self::Go => Box::new(GoPackages::default()),
            Self::Directories => Box::new(Directories),
        }
    }
}

impl std::fmt::Display for DiscoveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiscoveryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "go" => Ok(Self::Go),
            "dirs" | "directories" => Ok(Self::Directories),
            _ => Err(format!("Unknown discovery mode: {s} (expected 'go' or 'dirs')")),
        }
    }
}

/// Discover Go `main` packages with `go list`.
#[derive(Debug, Clone)]
pub struct GoPackages {
    program: String,
}

impl Default for GoPackages {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
        }
    }
}

impl GoPackages {
    /// Use a different toolchain executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf, DiscoveryError> {
        which::which(&self.program)
            .map_err(|_| DiscoveryError::ToolchainMissing(self.program.clone()))
    }
}

impl SourceDiscovery for GoPackages {
    fn discover(&self, roots: &[String]) -> Result<Vec<String>, DiscoveryError> {
        let go = self.locate()?;
        let roots = if roots.is_empty() {
            vec![".".to_string()]
        } else {
            roots.to_vec()
        };

        let command = format!("{} list -f {GO_LIST_FORMAT} {}", self.program, roots.join(" "));
        tracing::debug!("running {command}");

        let output = Command::new(&go)
            .args(["list", "-f", GO_LIST_FORMAT])
            .args(&roots)
            .output()
            .map_err(|source| DiscoveryError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DiscoveryError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let packages = parse_go_list(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!("found {} main package(s): {:?}", packages.len(), packages);
        Ok(packages)
    }
}

/// Extract the import paths of `main` packages from `go list` output.
///
/// Lines that are not `name|import/path` are skipped with a warning.
pub fn parse_go_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let Some((name, import_path)) = line.split_once('|') else {
                tracing::warn!("bad line reading packages: {line}");
                return None;
            };
            (name == GO_MAIN_PACKAGE).then(|| import_path.to_string())
        })
        .collect()
}

/// Treat every root as a source directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Directories;

impl SourceDiscovery for Directories {
    fn discover(&self, roots: &[String]) -> Result<Vec<String>, DiscoveryError> {
        if roots.is_empty() {
            return Ok(vec![".".to_string()]);
        }
        for root in roots {
            if !Path::new(root).is_dir() {
                return Err(DiscoveryError::NotADirectory(PathBuf::from(root)));
            }
        }
        Ok(roots.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_go_list() {
        let output = "\
main|github.com/me/tool
lib|github.com/me/tool/internal/util

garbage line
main|github.com/me/tool/cmd/helper
";
        assert_eq!(
            parse_go_list(output),
            vec!["github.com/me/tool", "github.com/me/tool/cmd/helper"]
        );
        assert!(parse_go_list("").is_empty());
    }

    #[test]
    fn test_import_path_may_contain_separator() {
        assert_eq!(parse_go_list("main|a|b"), vec!["a|b"]);
    }

    #[test]
    fn test_discovery_kind_parsing() {
        assert_eq!("go".parse::<DiscoveryKind>(), Ok(DiscoveryKind::Go));
        assert_eq!("DIRS".parse::<DiscoveryKind>(), Ok(DiscoveryKind::Directories));
        assert!("cargo".parse::<DiscoveryKind>().is_err());
        assert_eq!(DiscoveryKind::Directories.to_string(), "dirs");
    }

    #[test]
    fn test_directories_checks_roots() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_string_lossy().into_owned();
        let found = Directories.discover(&[root.clone()]).unwrap();
        assert_eq!(found, vec![root]);

        let missing = tmp.path().join("nope").to_string_lossy().into_owned();
        assert!(matches!(
            Directories.discover(&[missing]),
            Err(DiscoveryError::NotADirectory(_))
        ));

        assert_eq!(Directories.discover(&[]).unwrap(), vec!["."]);
    }

    #[test]
    fn test_missing_toolchain() {
        let go = GoPackages::with_program("relpak-no-such-toolchain");
        assert!(matches!(
            go.discover(&[]),
            Err(DiscoveryError::ToolchainMissing(_))
        ));
    }
}
