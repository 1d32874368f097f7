//! Error types for rewrite operations

use std::path::PathBuf;
use thiserror::Error;

use crate::cst::SyntaxError as CstSyntaxError;

/// Main error type for rewrite operations
#[derive(Debug, Error)]
pub enum SendableError {
    /// Malformed input; the source unit is skipped
    #[error("Syntax error at {line}:{column}: {message}{}", more_suffix(.additional))]
    SyntaxError {
        message: String,
        line: usize,
        column: usize,
        /// Further errors in the same unit
        additional: usize,
    },

    /// A pass asked an editor to change a shape it cannot handle
    #[error("Structural invariant violated by pass '{pass}' on {decl}: {message}")]
    StructuralInvariant {
        pass: String,
        decl: String,
        message: String,
    },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

fn more_suffix(additional: &usize) -> String {
    match *additional {
        0 => String::new(),
        1 => " (and 1 more)".to_string(),
        n => format!(" (and {n} more)"),
    }
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    StructuralInvariant,
    Io,
    Config,
}

impl SendableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SendableError::SyntaxError { .. } => ErrorKind::Syntax,
            SendableError::StructuralInvariant { .. } => ErrorKind::StructuralInvariant,
            SendableError::IoError { .. } => ErrorKind::Io,
            SendableError::ConfigError { .. } => ErrorKind::Config,
        }
    }

    /// Check if processing of other files can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Syntax | ErrorKind::Io)
    }

    /// Summarize the syntax errors of one source unit
    ///
    /// Returns `None` for an empty list.
    pub fn from_syntax_errors(errors: &[CstSyntaxError]) -> Option<Self> {
        let first = errors.first()?;
        Some(Self::SyntaxError {
            message: first.message.clone(),
            line: first.line,
            column: first.column,
            additional: errors.len() - 1,
        })
    }

    /// Create a structural invariant error
    pub fn structural(
        pass: impl Into<String>,
        decl: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StructuralInvariant {
            pass: pass.into(),
            decl: decl.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

impl From<CstSyntaxError> for SendableError {
    fn from(error: CstSyntaxError) -> Self {
        Self::SyntaxError {
            message: error.message,
            line: error.line,
            column: error.column,
            additional: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_swift;

    #[test]
    fn test_syntax_error_summary() {
        let (_, errors) = parse_swift("}\n}\nstruct A {}");
        let error = SendableError::from_syntax_errors(&errors).unwrap();
        assert_eq!(error.to_string(), "Syntax error at 1:1: unexpected `}` (and 1 more)");
        assert!(error.is_recoverable());
        assert!(SendableError::from_syntax_errors(&[]).is_none());
    }

    #[test]
    fn test_structural_errors_are_fatal() {
        let error = SendableError::structural("marker", "func run", "no inheritance clause on functions");
        assert_eq!(error.kind(), ErrorKind::StructuralInvariant);
        assert!(!error.is_recoverable());
        assert_eq!(
            error.to_string(),
            "Structural invariant violated by pass 'marker' on func run: no inheritance clause on functions"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let error = SendableError::io_error(
            "Sources/A.swift",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("Sources/A.swift"));
    }
}
