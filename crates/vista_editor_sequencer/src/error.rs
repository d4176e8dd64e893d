// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by track edits.

use thiserror::Error;

/// A rejected edit. No edit that returns an error leaves partial changes behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// User supplied value is not usable (unparsable or non-finite number, wrong width)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Structural precondition violated (last keyframe, stale index, unknown track)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl EditError {
    /// Shorthand for [`EditError::InvalidInput`]
    pub fn input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for [`EditError::InvalidOperation`]
    pub fn operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }
}

/// Result type for track edits
pub type Result<T> = std::result::Result<T, EditError>;

/// Parse a user-typed time or factor into a finite number.
pub fn parse_time(text: &str) -> Result<f32> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|_| EditError::input(format!("'{}' is not a number", text.trim())))?;

    if !value.is_finite() {
        return Err(EditError::input(format!("'{}' is not a finite number", text.trim())));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("1.5"), Ok(1.5));
        assert_eq!(parse_time("  -2 "), Ok(-2.0));
        assert!(matches!(parse_time("abc"), Err(EditError::InvalidInput(_))));
        assert!(matches!(parse_time(""), Err(EditError::InvalidInput(_))));
        assert!(matches!(parse_time("NaN"), Err(EditError::InvalidInput(_))));
        assert!(matches!(parse_time("inf"), Err(EditError::InvalidInput(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = EditError::operation("track needs at least one keyframe");
        assert_eq!(err.to_string(), "Invalid operation: track needs at least one keyframe");
    }
}
