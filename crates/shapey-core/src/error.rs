//! Error types for the Shapey core library
//!
//! Applying a spec never fails: transform failures are isolated per field
//! (see [`crate::safety`]). The only fallible surface is turning data into
//! a [`crate::Spec`], which reports through [`Error`]. Transforms themselves
//! report through [`TransformError`].

use thiserror::Error;

/// Main error type for Shapey operations
#[derive(Error, Debug)]
pub enum Error {
    /// The spec document is not shaped like a spec
    #[error("Invalid spec: {message}")]
    InvalidSpec {
        message: String,
        path: Option<String>,
    },

    /// A `$transform` reference names nothing in the registry
    #[error("Unknown transform '{name}' at {path}")]
    UnknownTransform { name: String, path: String },

    /// A registered transform rejected its arguments
    #[error("Invalid arguments for transform '{name}': {message}")]
    InvalidTransformArgs { name: String, message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid spec error at the given location
    pub fn invalid_spec(message: impl Into<String>, path: impl Into<String>) -> Self {
        Error::InvalidSpec {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an invalid transform arguments error
    pub fn invalid_args(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidTransformArgs {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Failure raised while a transform runs against a value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The transform gave up on its input
    #[error("Transform failed: {message}")]
    Failed { message: String },

    /// The input was not of a type the transform understands
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The transform panicked; the payload is kept when it is a string
    #[error("Transform panicked: {message}")]
    Panicked { message: String },
}

impl TransformError {
    /// Create a generic failure
    pub fn failed(message: impl Into<String>) -> Self {
        TransformError::Failed {
            message: message.into(),
        }
    }

    /// Create a type mismatch from the expected type name and the offending value
    pub fn type_mismatch(expected: impl Into<String>, found: &serde_json::Value) -> Self {
        TransformError::TypeMismatch {
            expected: expected.into(),
            found: crate::value::type_name(found).to_string(),
        }
    }
}

/// Result of running a single transform
pub type TransformResult = std::result::Result<serde_json::Value, TransformError>;

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for TransformError {
    fn from(err: anyhow::Error) -> Self {
        TransformError::Failed {
            message: format!("{:#}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_spec("expected an object", "$.address");
        assert_eq!(err.to_string(), "Invalid spec: expected an object");

        let err = Error::UnknownTransform {
            name: "shout".to_string(),
            path: "$.name".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown transform 'shout' at $.name");
    }

    #[test]
    fn test_type_mismatch_names_found_type() {
        let err = TransformError::type_mismatch("string", &json!([1, 2]));
        assert_eq!(err.to_string(), "Type mismatch: expected string, found array");
    }

    #[test]
    fn test_anyhow_converts_to_transform_error() {
        let err: TransformError = anyhow::anyhow!("no such jim").into();
        assert_eq!(err, TransformError::failed("no such jim"));
    }
}
