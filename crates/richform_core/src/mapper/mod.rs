//! Data mappers: move values between bound data and sibling fields.
//!
//! # Responsibility
//! - Define the two-method mapper contract shared by every implementation.
//! - Provide the policy-driven `DataMapper` and the generic
//!   `PropertyPathMapper` it falls back to.
//!
//! # Invariants
//! - Mappers borrow fields and data for one call only.
//! - `map_forms_to_data` is a no-op for `Null` data.

pub mod data_mapper;
pub mod property_path_mapper;

use crate::error::{MappingError, MappingResult};
use crate::field::FieldNode;
use crate::value::Value;

pub use data_mapper::DataMapper;
pub use property_path_mapper::PropertyPathMapper;

/// Kinds accepted as bound data, as reported in type-mismatch errors.
pub const ACCEPTED_DATA_KINDS: &str = "object, map or null";

/// Two-way mapping between bound data and a batch of sibling fields.
pub trait FormDataMapper {
    /// Populates `fields` from `data`.
    fn map_data_to_forms(&self, data: &Value, fields: &mut [&mut FieldNode])
        -> MappingResult<()>;

    /// Writes the submitted values of `fields` into `data`.
    fn map_forms_to_data(&self, fields: &mut [&mut FieldNode], data: &mut Value)
        -> MappingResult<()>;
}

/// Rejects data that is neither null, a map nor an object.
pub(crate) fn ensure_bindable(data: &Value) -> MappingResult<()> {
    match data {
        Value::Null | Value::Map(_) | Value::Object(_) => Ok(()),
        other => Err(MappingError::UnexpectedType {
            expected: ACCEPTED_DATA_KINDS,
            given: other.kind(),
        }),
    }
}
