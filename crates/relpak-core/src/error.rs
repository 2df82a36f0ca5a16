//! Domain-specific errors for the packaging pipeline

use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use crate::template::TemplateError;
use thiserror::Error;

/// Which of the two path templates an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    /// The executable path template (`--input`).
    Input,
    /// The archive path template (`--output`).
    Output,
}

impl std::fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A path template failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{role} template error: {source}")]
pub struct PathError {
    /// Template the error belongs to.
    pub role: TemplateRole,
    /// What went wrong.
    #[source]
    pub source: TemplateError,
}

impl PathError {
    /// Attach `role` to a template error.
    pub fn new(role: TemplateRole, source: TemplateError) -> Self {
        Self { role, source }
    }
}

/// Fatal errors that stop a packaging run before any archive is written.
#[derive(Error, Debug)]
pub enum PackError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source directories could not be discovered.
    #[error("Source discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// A path template is invalid.
    #[error(transparent)]
    Path(#[from] PathError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_error_names_role() {
        let err = PathError::new(TemplateRole::Output, TemplateError::Unclosed(4));
        assert_eq!(
            err.to_string(),
            "output template error: unclosed placeholder at position 4"
        );

        let err: PackError = err.into();
        assert!(err.to_string().starts_with("output template"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: PackError = ConfigError::NotFound("relpak.toml".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: config file not found: relpak.toml"
        );
    }
}
