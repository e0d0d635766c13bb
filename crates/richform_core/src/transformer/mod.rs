//! Two-way value transformers attached to fields.
//!
//! # Responsibility
//! - `transform`: model or norm value to its displayed form.
//! - `reverse_transform`: submitted form back to a model value.
//!
//! # Invariants
//! - A transformer receives the owning field read-only; it never mutates
//!   field state itself.

pub mod integer;
pub mod value_object;

use crate::error::TransformError;
use crate::field::FieldNode;
use crate::value::Value;

pub use integer::IntegerToStringTransformer;
pub use value_object::ValueObjectTransformer;

/// Converts a value in both directions for one field.
pub trait DataTransformer {
    fn transform(&self, field: &FieldNode, value: Value) -> Result<Value, TransformError>;

    fn reverse_transform(&self, field: &FieldNode, value: Value)
        -> Result<Value, TransformError>;
}
