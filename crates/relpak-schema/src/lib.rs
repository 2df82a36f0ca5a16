//! relpak-schema - shared types for relpak
//!
//! Everything in this crate is plain data: the canonical value tables for the
//! three packaging dimensions, the [`ArchiveFormat`] identifiers, and the
//! target records that flow through the resolution pipeline in `relpak-core`.
//!
//! # Lifecycle
//!
//! A target moves through three types, each built from the previous one and
//! never mutated afterwards:
//!
//! - [`Target`]: the bare `os/arch/archive` triple produced by assembly.
//! - [`ResolvedTarget`]: the triple bound to one source directory, with its
//!   executable and archive paths rendered.
//! - [`BundledTarget`]: the resolved target plus the ordered file manifest.

pub mod dimension;
pub mod format;
pub mod target;

// Re-exports
pub use dimension::*;
pub use format::ArchiveFormat;
pub use target::*;
