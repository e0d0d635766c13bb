//! Named registry of exception handling strategies.

use crate::error::{Failure, FieldError};
use crate::exception::handlers::{
    ArgumentTypeMismatchHandler, ExceptionHandler, FallbackExceptionHandler,
    GenericExceptionHandler, STRATEGY_FALLBACK, STRATEGY_GENERIC, STRATEGY_TYPE_ERROR,
};
use crate::exception::ExceptionTranslator;
use crate::field::{FieldConfig, FieldNode};
use crate::value::Value;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Strategy registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionHandlerRegistryError {
    InvalidStrategyName(String),
    DuplicateStrategy(String),
}

impl Display for ExceptionHandlerRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStrategyName(value) => write!(f, "strategy name is invalid: {value}"),
            Self::DuplicateStrategy(value) => {
                write!(f, "strategy already registered: {value}")
            }
        }
    }
}

impl Error for ExceptionHandlerRegistryError {}

/// Strategy name → handler.
#[derive(Default)]
pub struct ExceptionHandlerRegistry {
    handlers: BTreeMap<String, Rc<dyn ExceptionHandler>>,
}

impl ExceptionHandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `type_error`, `generic` and `fallback`.
    pub fn with_default_handlers() -> Self {
        let mut handlers: BTreeMap<String, Rc<dyn ExceptionHandler>> = BTreeMap::new();
        handlers.insert(
            STRATEGY_TYPE_ERROR.to_string(),
            Rc::new(ArgumentTypeMismatchHandler),
        );
        handlers.insert(STRATEGY_GENERIC.to_string(), Rc::new(GenericExceptionHandler));
        handlers.insert(STRATEGY_FALLBACK.to_string(), Rc::new(FallbackExceptionHandler));
        Self { handlers }
    }

    /// Registers one handler under a strategy name.
    pub fn register(
        &mut self,
        strategy: &str,
        handler: Rc<dyn ExceptionHandler>,
    ) -> Result<(), ExceptionHandlerRegistryError> {
        let strategy = strategy.trim().to_string();
        if !is_valid_strategy_name(&strategy) {
            return Err(ExceptionHandlerRegistryError::InvalidStrategyName(strategy));
        }
        if self.handlers.contains_key(strategy.as_str()) {
            return Err(ExceptionHandlerRegistryError::DuplicateStrategy(strategy));
        }

        self.handlers.insert(strategy, handler);
        Ok(())
    }

    /// Returns sorted strategy names.
    pub fn strategies(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn get(&self, strategy: &str) -> Option<Rc<dyn ExceptionHandler>> {
        self.handlers.get(strategy.trim()).cloned()
    }

    /// Strategy names applied to a field, in evaluation order.
    ///
    /// Explicit `exception_handling_strategy` wins; otherwise `generic` is
    /// tried first when the field lists expected failures.
    pub fn strategies_for(config: &FieldConfig) -> Vec<String> {
        if !config.exception_handling_strategy.is_empty() {
            return config.exception_handling_strategy.clone();
        }
        if config.expected_exception.is_empty() {
            vec![STRATEGY_TYPE_ERROR.to_string()]
        } else {
            vec![STRATEGY_GENERIC.to_string(), STRATEGY_TYPE_ERROR.to_string()]
        }
    }
}

impl ExceptionTranslator for ExceptionHandlerRegistry {
    fn map_exception_to_error(
        &self,
        field: &FieldNode,
        data: &Value,
        failure: &Failure,
    ) -> Option<FieldError> {
        for strategy in Self::strategies_for(field.config()) {
            let Some(handler) = self.get(&strategy) else {
                warn!(
                    "event=unknown_strategy module=exception status=skipped field={} strategy={}",
                    field.name(),
                    strategy
                );
                continue;
            };
            if let Some(error) = handler.get_error(field.config(), data, failure) {
                debug!(
                    "event=failure_translated module=exception status=ok field={} strategy={} failure={}",
                    field.name(),
                    strategy,
                    failure.kind()
                );
                return Some(error);
            }
        }

        None
    }
}

fn is_valid_strategy_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
