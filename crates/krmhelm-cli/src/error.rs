//! CLI error type with exit code mapping

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// Errors surfaced by the function binary
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Failure inside the function pipeline
    #[error(transparent)]
    #[diagnostic(transparent)]
    Function(#[from] krmhelm_core::Error),

    /// Reading the input or writing the output failed
    #[error("{context}: {source}")]
    #[diagnostic(code(krmhelm::cli::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Internal error (runtime, unexpected failure)
    #[error("internal error: {message}")]
    #[diagnostic(code(krmhelm::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        use krmhelm_core::Error as E;

        match self {
            CliError::Function(err) => match err {
                E::Validation { .. } => exit_codes::VALIDATION_ERROR,
                E::Parse { .. } => exit_codes::PARSE_ERROR,
                E::NotFound { .. } => exit_codes::NOT_FOUND,
                E::Generation { .. } => exit_codes::GENERATION_ERROR,
                E::Io { .. } => exit_codes::IO_ERROR,
                _ => exit_codes::ERROR,
            },
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
