//! Error types for hostwatch.
//!
//! - [`AccessError`] - Errors while resolving or applying a field accessor
//! - [`BoxError`] - Type-erased errors carried by source error signals

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while extracting a field from a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The payload's shape has no field with the requested name.
    #[error("field `{field}` not found on payload `{shape}`")]
    FieldNotFound {
        /// Type name of the payload shape.
        shape: &'static str,
        /// The field that was looked up.
        field: &'static str,
    },

    /// An accessor resolved for one shape was applied to another.
    #[error("accessor for `{expected}` applied to payload `{found}`")]
    ShapeMismatch {
        /// Shape the accessor was resolved against.
        expected: &'static str,
        /// Shape of the payload it was applied to.
        found: &'static str,
    },

    /// The field exists but holds a value of a different type.
    #[error("field `{field}` on payload `{shape}` is not a `{expected}`")]
    TypeMismatch {
        /// Type name of the payload shape.
        shape: &'static str,
        /// The field that was read.
        field: &'static str,
        /// Type the caller asked for.
        expected: &'static str,
    },
}

impl AccessError {
    /// Returns `true` for [`AccessError::FieldNotFound`].
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, AccessError::FieldNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_message() {
        let err = AccessError::FieldNotFound {
            shape: "StartPayload",
            field: "HttpContext",
        };
        assert!(err.is_field_not_found());
        assert_eq!(
            err.to_string(),
            "field `HttpContext` not found on payload `StartPayload`"
        );
    }

    #[test]
    fn test_type_mismatch_is_not_field_not_found() {
        let err = AccessError::TypeMismatch {
            shape: "StartPayload",
            field: "HttpContext",
            expected: "u32",
        };
        assert!(!err.is_field_not_found());
    }
}
