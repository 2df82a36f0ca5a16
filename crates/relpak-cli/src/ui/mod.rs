//! UI module - terminal output
//!
//! ```text
//! commands ──► Output (implements Reporter) ──► stdout
//!          └─► table (plan listing)
//!                     both styled with Theme
//! ```
//!
//! Diagnostics go through `tracing` to stderr; everything here is the
//! user-facing report on stdout.

pub mod output;
pub mod table;
pub mod theme;

pub use output::Output;
pub use theme::Theme;
