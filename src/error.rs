use thiserror::Error;

/// Unified error type for pandoc-publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Staging error: {0}")]
    Staging(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Unexpected tool output: {0}")]
    UnexpectedOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pandoc-publish
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        PublishError::Version(msg.into())
    }

    /// Create a staging error with context
    pub fn staging(msg: impl Into<String>) -> Self {
        PublishError::Staging(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        PublishError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        PublishError::Remote(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        PublishError::Branch(msg.into())
    }

    /// Create a conversion error with context
    pub fn conversion(msg: impl Into<String>) -> Self {
        PublishError::Conversion(msg.into())
    }

    /// Create an unexpected-output error with context
    ///
    /// Reserved for tool responses outside the known grammar. These signal a
    /// violated assumption about the external tool, not an operational fault.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        PublishError::UnexpectedOutput(msg.into())
    }

    /// Exit code reported to the shell for this error kind
    pub const fn exit_code(&self) -> i32 {
        match *self {
            PublishError::Config(_) => 1,
            PublishError::Version(_) => 2,
            PublishError::Staging(_) => 3,
            PublishError::Tag(_) => 3,
            PublishError::Remote(_) => 3,
            PublishError::Branch(_) => 4,
            PublishError::Conversion(_) => 5,
            PublishError::UnexpectedOutput(_) => 6,
            PublishError::Io(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PublishError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PublishError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(PublishError::version("test")
            .to_string()
            .contains("Version"));
        assert!(PublishError::tag("test").to_string().contains("Tag"));
        assert!(PublishError::staging("test").to_string().contains("Staging"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (PublishError::config("x"), "Configuration error"),
            (PublishError::version("x"), "Version parsing error"),
            (PublishError::staging("x"), "Staging error"),
            (PublishError::tag("x"), "Tag error"),
            (PublishError::remote("x"), "Remote operation failed"),
            (PublishError::branch("x"), "Branch error"),
            (PublishError::conversion("x"), "Conversion failed"),
            (PublishError::unexpected("x"), "Unexpected tool output"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_usage_errors_exit_one() {
        assert_eq!(PublishError::config("missing file").exit_code(), 1);
    }

    #[test]
    fn test_unexpected_output_has_distinct_exit_code() {
        let hard = PublishError::unexpected("checkout said something odd").exit_code();
        let soft = PublishError::remote("offline").exit_code();
        assert_ne!(hard, soft);
    }
}
