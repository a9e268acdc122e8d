// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error type shared by all music theory operations.

use thiserror::Error;

/// Errors raised by parsing, construction, and arithmetic on theory values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    /// Malformed textual input
    #[error("parse error: {0}")]
    Parse(String),
    /// Well-typed but semantically invalid value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Operation undefined for the given operands
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl TheoryError {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        TheoryError::Parse(msg.into())
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        TheoryError::InvalidArgument(msg.into())
    }

    pub(crate) fn operation(msg: impl Into<String>) -> Self {
        TheoryError::InvalidOperation(msg.into())
    }

    /// Re-tag any error as a parse error, keeping its message
    pub(crate) fn into_parse(self) -> Self {
        match self {
            TheoryError::Parse(msg)
            | TheoryError::InvalidArgument(msg)
            | TheoryError::InvalidOperation(msg) => TheoryError::Parse(msg),
        }
    }
}

/// Result alias for theory operations
pub type Result<T> = std::result::Result<T, TheoryError>;
