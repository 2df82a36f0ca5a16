//! relpak - release packager
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Packages cross-compiled executables into release archives, one per
//! OS/architecture/archive-format combination.
//!
//! # Pipeline
//!
//! ```text
//! --os / --arch / --archive ──► resolve each dimension
//!                               │
//! --packages ─────────────────► assemble targets (cross product + overrides)
//!                               │
//! source discovery ───────────► render --input / --output per directory
//!                               │
//! --files ────────────────────► attach manifest ──► write archives
//! ```

pub mod cmd;
pub mod ui;

use clap::{Args, Parser, Subcommand};
use relpak_core::config::ConfigOverrides;
use relpak_core::discovery::DiscoveryKind;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "relpak")]
#[command(version = env!("RELPAK_VERSION"), about = "relpak - package your multi-os/arch executables")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file (default: ./.relpak.toml, then the user config dir)
    #[arg(short, long, global = true, env = "RELPAK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write debug messages to the console
    #[arg(short = 'D', long, global = true, hide = true)]
    pub debug: bool,

    /// Show what would happen without writing or deleting anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Package executables into archives
    Package(PackArgs),
    /// Show the archives that would be written, without writing them
    Plan {
        #[command(flatten)]
        args: PackArgs,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options shared by `package` and `plan`.
///
/// Lists accept space or comma separated values and may be repeated. Prefix
/// a value with `!` to exclude it. Values given here replace the config
/// file's lists.
#[derive(Debug, Clone, Default, Args)]
pub struct PackArgs {
    /// Directories or Go package patterns to search (default: .)
    pub roots: Vec<String>,

    /// Input path template
    #[arg(short, long, env = "RELPAK_INPUT")]
    pub input: Option<String>,

    /// Output path template
    #[arg(short, long, env = "RELPAK_OUTPUT")]
    pub output: Option<String>,

    /// Additional files to add to every archive
    #[arg(short, long, env = "RELPAK_FILES")]
    pub files: Vec<String>,

    /// Archive formats to create (all, default, zip, tar, tgz, ...)
    #[arg(short = 'r', long, env = "RELPAK_ARCHIVE")]
    pub archive: Vec<String>,

    /// Operating systems to package
    #[arg(short = 's', long, env = "RELPAK_OS")]
    pub os: Vec<String>,

    /// Architectures to package
    #[arg(short, long, env = "RELPAK_ARCH")]
    pub arch: Vec<String>,

    /// Explicit os/arch/archive entries to include (or !exclude)
    #[arg(short, long, env = "RELPAK_PACKAGES")]
    pub packages: Vec<String>,

    /// Delete the executables after packaging
    #[arg(short, long, env = "RELPAK_DELETE", overrides_with = "no_delete")]
    pub delete: bool,

    /// Keep the executables, even if the config file sets `delete`
    #[arg(long, overrides_with = "delete")]
    pub no_delete: bool,

    /// How to find source directories: go or dirs
    #[arg(long, env = "RELPAK_DISCOVERY")]
    pub discovery: Option<DiscoveryKind>,
}

impl PackArgs {
    /// Values given on the command line or in the environment.
    pub fn overrides(&self) -> ConfigOverrides {
        fn list(values: &[String]) -> Option<Vec<String>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        ConfigOverrides {
            input: self.input.clone(),
            output: self.output.clone(),
            files: list(&self.files),
            os: list(&self.os),
            arch: list(&self.arch),
            archive: list(&self.archive),
            packages: list(&self.packages),
            delete: if self.no_delete {
                Some(false)
            } else {
                self.delete.then_some(true)
            },
            discovery: self.discovery,
            roots: list(&self.roots),
        }
    }
}
