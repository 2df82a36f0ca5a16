//! IO modules - side effects (filesystem)

pub mod archive;
pub mod cleanup;

pub use archive::{ArchiveError, write_archive, writer_for};
pub use cleanup::{file_exists, is_dir_empty, remove_executable};
