//! Model transformer for immutable value objects.
//!
//! # Responsibility
//! - Expose the properties of a value object as field values.
//! - Rebuild a fresh value object from submitted values through the
//!   configured factory.
//!
//! # Invariants
//! - The bound value object is never mutated; reverse transformation always
//!   returns a new instance.
//! - Construction failures either become a `TransformationFailed` carrying
//!   the translated message or are returned untouched.
//!
//! # See also
//! - `crate::instantiator::ViewDataInstantiator`

use crate::access::{PropertyAccessor, PropertyPath};
use crate::error::{Failure, TransformError, TransformationFailed};
use crate::exception::{ExceptionHandlerRegistry, ExceptionTranslator};
use crate::field::{FieldNode, ReadPropertyPath};
use crate::instantiator::ViewDataInstantiator;
use crate::transformer::DataTransformer;
use crate::value::{Value, ValueMap};
use log::debug;
use std::rc::Rc;

pub struct ValueObjectTransformer {
    registry: Rc<ExceptionHandlerRegistry>,
    accessor: Rc<dyn PropertyAccessor>,
}

impl ValueObjectTransformer {
    pub fn new(registry: Rc<ExceptionHandlerRegistry>, accessor: Rc<dyn PropertyAccessor>) -> Self {
        Self { registry, accessor }
    }

    /// Reads the value `field` displays from `object`.
    ///
    /// An explicit `property_path` wins; otherwise the factory argument name,
    /// then the read path, then the field name is used.
    fn property_value(&self, field: &FieldNode, object: &Value) -> Result<Value, Failure> {
        let config = field.config();
        if let Some(path) = &config.property_path {
            return self.accessor.get_value(object, path);
        }
        if let Some(argument) = &config.factory_argument {
            return self
                .accessor
                .get_value(object, &PropertyPath::new(argument.as_str()));
        }

        match &config.read_property_path {
            Some(ReadPropertyPath::Accessor(read)) => read(object),
            Some(ReadPropertyPath::Path(path)) => self.accessor.get_value(object, path),
            None => self
                .accessor
                .get_value(object, &PropertyPath::new(field.name())),
        }
    }
}

impl DataTransformer for ValueObjectTransformer {
    fn transform(&self, field: &FieldNode, value: Value) -> Result<Value, TransformError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        if !field.is_compound() {
            return self
                .property_value(field, &value)
                .map_err(TransformError::Failure);
        }

        let mut view = ValueMap::new();
        for child in field.children() {
            if child.is_button() || !child.is_mapped() {
                continue;
            }
            let child_value = self
                .property_value(child, &value)
                .map_err(TransformError::Failure)?;
            view.insert(child.name().to_string(), child_value);
        }
        Ok(Value::Map(view))
    }

    fn reverse_transform(
        &self,
        field: &FieldNode,
        value: Value,
    ) -> Result<Value, TransformError> {
        let failure = match ViewDataInstantiator::new(field, value.clone()).instantiate_object() {
            Ok(object) => return Ok(object),
            Err(failure) => failure,
        };

        match self.registry.map_exception_to_error(field, &value, &failure) {
            Some(error) => {
                debug!(
                    "event=instantiation_failed module=value_object status=translated field={} failure={}",
                    field.name(),
                    failure.kind()
                );
                Err(TransformError::Failed(TransformationFailed::caused_by(
                    error.render(),
                    failure,
                )))
            }
            None => Err(TransformError::Failure(failure)),
        }
    }
}
