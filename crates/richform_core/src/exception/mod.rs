//! Failure-to-field-error translation.
//!
//! # Responsibility
//! - Map failures raised by domain code to user-facing `FieldError`s.
//! - Let callers decide between record-and-continue and propagate.
//!
//! # Invariants
//! - A declined translation hands the original failure back unchanged.

pub mod handlers;
pub mod registry;

use crate::error::{Failure, FieldError};
use crate::field::FieldNode;
use crate::value::Value;
use log::{info, warn};
use std::rc::Rc;

pub use handlers::{
    ArgumentTypeMismatchHandler, ExceptionHandler, FallbackExceptionHandler,
    GenericExceptionHandler, STRATEGY_FALLBACK, STRATEGY_GENERIC, STRATEGY_TYPE_ERROR,
};
pub use registry::{ExceptionHandlerRegistry, ExceptionHandlerRegistryError};

/// Translates a failure raised for `field` into an optional field error.
pub trait ExceptionTranslator {
    fn map_exception_to_error(
        &self,
        field: &FieldNode,
        data: &Value,
        failure: &Failure,
    ) -> Option<FieldError>;
}

/// Records translated failures on the field, or returns them untouched.
#[derive(Clone)]
pub struct FormExceptionHandler {
    translator: Rc<dyn ExceptionTranslator>,
}

impl FormExceptionHandler {
    pub fn new(translator: Rc<dyn ExceptionTranslator>) -> Self {
        Self { translator }
    }

    /// Returns `Ok(())` when the failure became a field error, otherwise the
    /// original failure.
    pub fn handle_exception(
        &self,
        field: &mut FieldNode,
        data: &Value,
        failure: Failure,
    ) -> Result<(), Failure> {
        match self.translator.map_exception_to_error(field, data, &failure) {
            Some(error) => {
                info!(
                    "event=field_error_recorded module=exception status=ok field={} failure={}",
                    field.name(),
                    failure.kind()
                );
                field.add_error(error);
                Ok(())
            }
            None => {
                warn!(
                    "event=failure_unhandled module=exception status=error field={} failure={}",
                    field.name(),
                    failure.kind()
                );
                Err(failure)
            }
        }
    }
}
