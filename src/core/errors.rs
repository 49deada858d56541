//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for directable operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A `file:line:column` string that could not be parsed
    #[error("Invalid source location '{0}'")]
    InvalidLocation(String),

    /// A unit source refers to a class that is never declared
    #[error("Unknown class '{0}'")]
    UnknownClass(String),

    /// A unit source refers to a category that is never declared
    #[error("Unknown category '{category}' on class '{class}'")]
    UnknownCategory { class: String, category: String },

    /// A method names a property its container does not declare
    #[error("Unknown property '{property}' referenced by '{method}'")]
    UnknownProperty { property: String, method: String },

    /// Two declarations claim the same name
    #[error("Duplicate declaration: {0}")]
    Duplicate(String),

    /// The superclass chain of a class loops back on itself
    #[error("Inheritance cycle through class '{0}'")]
    InheritanceCycle(String),

    /// Model-level validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A finalized report would contain an entry that is also blocked
    #[error("Report invariant violated: {0}")]
    Invariant(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a file system error wrapping the underlying I/O failure
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            message: source.to_string(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Errors caused by the input rather than by the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLocation(_)
                | Self::UnknownClass(_)
                | Self::UnknownCategory { .. }
                | Self::UnknownProperty { .. }
                | Self::Duplicate(_)
                | Self::InheritanceCycle(_)
                | Self::Validation(_)
                | Self::Json(_)
                | Self::Yaml(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let err = Error::UnknownClass("Widget".into()).with_context("loading unit.json");
        assert_eq!(err.to_string(), "loading unit.json: Unknown class 'Widget'");
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::InheritanceCycle("A".into()));
        let err = result.context("validating").unwrap_err();
        assert!(err.to_string().starts_with("validating: "));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(Error::Duplicate("class A".into()).is_input_error());
        assert!(!Error::Configuration("bad".into()).is_input_error());
        assert!(!Error::Invariant("overlap".into()).is_input_error());
    }
}
