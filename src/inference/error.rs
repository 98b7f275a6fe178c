//! Error types for schema extraction

use std::fmt::Display;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during schema extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The source could not be read, or its format is not supported
    #[error("Cannot access source '{path}': {reason}")]
    SourceAccess { path: String, reason: String },

    /// The selection matched no units
    #[error("No data found matching '{pattern}'")]
    NoMatch { pattern: String },
}

impl ExtractError {
    /// Wrap any displayable failure as a source access error for `path`
    pub fn access(path: impl AsRef<Path>, err: impl Display) -> Self {
        ExtractError::SourceAccess {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn no_match(pattern: impl Into<String>) -> Self {
        ExtractError::NoMatch {
            pattern: pattern.into(),
        }
    }

    /// Path or pattern the error refers to
    pub fn target(&self) -> &str {
        match self {
            ExtractError::SourceAccess { path, .. } => path,
            ExtractError::NoMatch { pattern } => pattern,
        }
    }
}
