//! Packaging configuration
//!
//! A [`PackConfig`] is assembled once at startup, in increasing priority,
//! from built-in defaults, a TOML config file and command-line/environment
//! overrides. It is then passed by reference; nothing reads global state.
//!
//! ```toml
//! # .relpak.toml
//! input = "build/{{.Dir}}_{{.OS}}_{{.Arch}}"
//! output = "dist/{{.Dir}}_{{.OS}}_{{.Arch}}.{{.Archive}}"
//! os = ["linux", "darwin", "windows"]
//! arch = "amd64 arm64"
//! files = ["README.md", "LICENSE"]
//! ```

use crate::discovery::DiscoveryKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default input path template.
pub const DEFAULT_INPUT_TEMPLATE: &str = "{{.Dir}}_{{.OS}}_{{.Arch}}";

/// Default output path template.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{{.Dir}}_{{.OS}}_{{.Arch}}.{{.Archive}}";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".relpak.toml";

/// Config file looked up under the user config directory.
pub const USER_CONFIG_FILE: &str = "relpak/config.toml";

/// Errors raised while loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unexpected keys.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Everything a packaging run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Template for the executable path of each target.
    pub input: String,
    /// Template for the archive path of each target.
    pub output: String,
    /// Extra files added to every archive.
    #[serde(deserialize_with = "string_or_list")]
    pub files: Vec<String>,
    /// Operating system list; empty means all.
    #[serde(deserialize_with = "string_or_list")]
    pub os: Vec<String>,
    /// Architecture list; empty means all.
    #[serde(deserialize_with = "string_or_list")]
    pub arch: Vec<String>,
    /// Archive format list; empty means the defaults.
    #[serde(deserialize_with = "string_or_list")]
    pub archive: Vec<String>,
    /// Explicit `[!]os/arch/archive` entries.
    #[serde(deserialize_with = "string_or_list")]
    pub packages: Vec<String>,
    /// Delete executables after they have been archived.
    pub delete: bool,
    /// How source directories are found.
    pub discovery: DiscoveryKind,
    /// Roots handed to source discovery.
    #[serde(deserialize_with = "string_or_list")]
    pub roots: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT_TEMPLATE.to_string(),
            output: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            files: Vec::new(),
            os: Vec::new(),
            arch: Vec::new(),
            archive: Vec::new(),
            packages: Vec::new(),
            delete: false,
            discovery: DiscoveryKind::default(),
            roots: vec![".".to_string()],
        }
    }
}

/// Values from the command line or environment that replace config values.
///
/// `None` leaves the underlying value alone. Lists replace, never extend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// See [`PackConfig::input`].
    pub input: Option<String>,
    /// See [`PackConfig::output`].
    pub output: Option<String>,
    /// See [`PackConfig::files`].
    pub files: Option<Vec<String>>,
    /// See [`PackConfig::os`].
    pub os: Option<Vec<String>>,
    /// See [`PackConfig::arch`].
    pub arch: Option<Vec<String>>,
    /// See [`PackConfig::archive`].
    pub archive: Option<Vec<String>>,
    /// See [`PackConfig::packages`].
    pub packages: Option<Vec<String>>,
    /// See [`PackConfig::delete`].
    pub delete: Option<bool>,
    /// See [`PackConfig::discovery`].
    pub discovery: Option<DiscoveryKind>,
    /// See [`PackConfig::roots`].
    pub roots: Option<Vec<String>>,
}

impl PackConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `toml::de::Error` on invalid TOML or unknown keys.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find the config file to use.
    ///
    /// An explicit path must exist. Otherwise `./.relpak.toml` and then
    /// `<config dir>/relpak/config.toml` are tried.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Ok(Some(local));
        }

        Ok(dirs::config_dir()
            .map(|dir| dir.join(USER_CONFIG_FILE))
            .filter(|path| path.is_file()))
    }

    /// Load the config file found by [`PackConfig::locate`], or the defaults
    /// if there is none. Returns the path that was used.
    ///
    /// # Errors
    ///
    /// Fails if an explicit file is missing, or a found file cannot be read
    /// or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate(explicit)? {
            Some(path) => {
                tracing::debug!("config: {}", path.display());
                Ok((Self::from_file(&path)?, Some(path)))
            }
            None => {
                tracing::debug!("config: none found, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// Apply command-line and environment overrides.
    pub fn overlay(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            input,
            output,
            files,
            os,
            arch,
            archive,
            packages,
            delete,
            discovery,
            roots,
        } = overrides;

        if let Some(v) = input {
            self.input = v;
        }
        if let Some(v) = output {
            self.output = v;
        }
        if let Some(v) = files {
            self.files = v;
        }
        if let Some(v) = os {
            self.os = v;
        }
        if let Some(v) = arch {
            self.arch = v;
        }
        if let Some(v) = archive {
            self.archive = v;
        }
        if let Some(v) = packages {
            self.packages = v;
        }
        if let Some(v) = delete {
            self.delete = v;
        }
        if let Some(v) = discovery {
            self.discovery = v;
        }
        if let Some(v) = roots {
            self.roots = v;
        }
        self
    }

    /// Discovery roots, falling back to the current directory.
    pub fn source_roots(&self) -> Vec<String> {
        if self.roots.is_empty() {
            vec![".".to_string()]
        } else {
            self.roots.clone()
        }
    }
}

/// Accept either `key = "a b"` or `key = ["a", "b"]`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
