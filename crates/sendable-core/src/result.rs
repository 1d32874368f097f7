//! Result type alias for rewrite operations

use crate::error::SendableError;

/// Standard Result type for rewrite operations
pub type Result<T> = std::result::Result<T, SendableError>;
