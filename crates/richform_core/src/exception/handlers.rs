//! Built-in failure-to-error strategies.

use crate::error::{Failure, FieldError};
use crate::field::FieldConfig;
use crate::value::Value;

/// Strategy name of [`ArgumentTypeMismatchHandler`].
pub const STRATEGY_TYPE_ERROR: &str = "type_error";
/// Strategy name of [`GenericExceptionHandler`].
pub const STRATEGY_GENERIC: &str = "generic";
/// Strategy name of [`FallbackExceptionHandler`].
pub const STRATEGY_FALLBACK: &str = "fallback";

/// Translates one failure into a field error, or declines with `None`.
pub trait ExceptionHandler {
    fn get_error(&self, config: &FieldConfig, data: &Value, failure: &Failure)
        -> Option<FieldError>;
}

/// Handles argument type and arity mismatches raised while binding values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentTypeMismatchHandler;

impl ExceptionHandler for ArgumentTypeMismatchHandler {
    fn get_error(
        &self,
        _config: &FieldConfig,
        _data: &Value,
        failure: &Failure,
    ) -> Option<FieldError> {
        let expected = match failure {
            Failure::ArgumentType { expected, .. } => *expected,
            Failure::ArgumentCount { .. } => "mixed",
            _ => return None,
        };

        Some(
            FieldError::new("This value should be of type {{ type }}.")
                .with_parameter("{{ type }}", expected),
        )
    }
}

/// Exposes the domain message of failures listed in `expected_exception`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExceptionHandler;

impl ExceptionHandler for GenericExceptionHandler {
    fn get_error(
        &self,
        config: &FieldConfig,
        _data: &Value,
        failure: &Failure,
    ) -> Option<FieldError> {
        let Failure::Domain { kind, message } = failure else {
            return None;
        };
        if !config.expected_exception.iter().any(|expected| expected == kind) {
            return None;
        }

        Some(FieldError::new(message.as_str()))
    }
}

/// Turns any failure into a generic submission error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExceptionHandler;

impl ExceptionHandler for FallbackExceptionHandler {
    fn get_error(
        &self,
        _config: &FieldConfig,
        _data: &Value,
        _failure: &Failure,
    ) -> Option<FieldError> {
        Some(FieldError::new(
            "An error has occurred during the form submission.",
        ))
    }
}
