//! Integer view transformer: `Int` model values shown as decimal strings.

use crate::error::{TransformError, TransformationFailed};
use crate::field::FieldNode;
use crate::transformer::DataTransformer;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToStringTransformer;

impl IntegerToStringTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl DataTransformer for IntegerToStringTransformer {
    fn transform(&self, _field: &FieldNode, value: Value) -> Result<Value, TransformError> {
        match value {
            Value::Null => Ok(Value::String(String::new())),
            Value::Int(number) => Ok(Value::String(number.to_string())),
            other => Err(TransformationFailed::new(format!(
                "expected an integer, {} given",
                other.kind()
            ))
            .into()),
        }
    }

    fn reverse_transform(
        &self,
        _field: &FieldNode,
        value: Value,
    ) -> Result<Value, TransformError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Int(number) => Ok(Value::Int(number)),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                trimmed.parse::<i64>().map(Value::Int).map_err(|_| {
                    TransformError::Failed(TransformationFailed::new(format!(
                        "\"{trimmed}\" is not a valid integer"
                    )))
                })
            }
            other => Err(TransformationFailed::new(format!(
                "expected a string, {} given",
                other.kind()
            ))
            .into()),
        }
    }
}
