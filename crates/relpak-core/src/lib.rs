//! relpak-core - target resolution and packaging
//!
//! The pure half of the crate turns user lists into an ordered set of
//! [`BundledTarget`]s:
//!
//! [`resolver`] → [`assemble`] → [`paths`] → [`manifest`]
//!
//! The side-effecting half ([`discovery`], [`io`], [`pipeline`]) finds the
//! source directories, writes the archives and cleans up afterwards.
//!
//! [`BundledTarget`]: relpak_schema::BundledTarget

pub mod assemble;
pub mod config;
pub mod discovery;
pub mod error;
pub mod io;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod reporter;
pub mod resolver;
pub mod template;

pub use assemble::{TargetSet, assemble};
pub use config::PackConfig;
pub use error::PackError;
pub use pipeline::{PackReport, Plan, package};
pub use reporter::{NullReporter, Reporter};
