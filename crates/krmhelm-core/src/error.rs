//! Error types shared by every stage of the pipeline

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while validating, parsing, resolving or generating a release
///
/// Every variant carries enough context (field path, document identity,
/// provider) to be the sole diagnostic printed by the function.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// The control document does not have the expected shape
    #[error("invalid functionConfig: {message}")]
    #[diagnostic(code(krmhelm::validation))]
    Validation { message: String },

    /// A field or document could not be parsed
    #[error("failed to parse {field}: {message}")]
    #[diagnostic(code(krmhelm::parse))]
    Parse { field: String, message: String },

    /// The requested provider is not registered
    #[error("unknown provider type: {provider}")]
    #[diagnostic(code(krmhelm::not_found))]
    NotFound {
        provider: String,
        #[help]
        help: Option<String>,
    },

    /// A provider failed to produce its output
    #[error("{provider} provider failed: {message}")]
    #[diagnostic(code(krmhelm::generation))]
    Generation { provider: String, message: String },

    /// Reading or writing data failed
    #[error("{context}: {message}")]
    #[diagnostic(code(krmhelm::io))]
    Io { context: String, message: String },
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a parse error for a field path or document
    pub fn parse(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Error for a required field that is absent
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            message: "field is required".to_string(),
        }
    }

    /// Error for a provider key that is not registered
    pub fn provider_not_found(provider: impl Into<String>, supported: &[&str]) -> Self {
        Self::NotFound {
            provider: provider.into(),
            help: Some(format!("supported providers: {}", supported.join(", "))),
        }
    }

    /// Create a generation error
    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with the operation that failed
    pub fn io(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
