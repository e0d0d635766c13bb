//! Domain object contract consumed by the path evaluator and the mappers.
//!
//! # Responsibility
//! - Expose named properties for reading and (optionally) writing.
//! - Describe multi-argument methods through declared signatures so several
//!   fields can be merged into one call.
//!
//! # Invariants
//! - Immutable value objects leave every write hook at its default, which
//!   reports the property or method as not writable.

use crate::error::{AccessError, Failure};
use crate::signature::Signature;
use crate::value::Value;
use std::any::Any;
use std::fmt::Debug;

/// Entity or value object bound to a field tree.
pub trait DomainObject: Any + Debug {
    /// Type label used in diagnostics.
    fn class_name(&self) -> &str;

    /// Reads one property; `None` when the property does not exist.
    fn read_property(&self, name: &str) -> Option<Value>;

    /// Writes one property.
    fn write_property(&mut self, name: &str, value: Value) -> Result<(), Failure> {
        let _ = value;
        Err(Failure::Access(AccessError::NotWritable {
            class: self.class_name().to_string(),
            property: name.to_string(),
        }))
    }

    /// Declared signature of a method accepting several bound values.
    fn signature(&self, method: &str) -> Option<Signature> {
        let _ = method;
        None
    }

    /// Invokes a method declared through [`DomainObject::signature`].
    ///
    /// `args` are ordered as the declared parameters.
    fn call_method(&mut self, method: &str, args: Vec<Value>) -> Result<(), Failure> {
        let _ = args;
        Err(Failure::UnknownMethod {
            class: self.class_name().to_string(),
            method: method.to_string(),
        })
    }

    fn as_any(&self) -> &dyn Any;
}
