use thiserror::Error;

/// Unified error type for git-autocommit operations
#[derive(Error, Debug)]
pub enum AutoCommitError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-autocommit
pub type Result<T> = std::result::Result<T, AutoCommitError>;

impl AutoCommitError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutoCommitError::Config(msg.into())
    }

    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        AutoCommitError::Validation(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        AutoCommitError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        AutoCommitError::Remote(msg.into())
    }

    /// Whether this error should cause the usage example to be printed
    pub fn is_validation(&self) -> bool {
        matches!(self, AutoCommitError::Validation(_))
    }
}
