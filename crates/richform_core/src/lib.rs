//! Bidirectional binding between domain objects and form field trees.
//!
//! `DataMapper` moves values between bound data and sibling fields using
//! explicit read/write options, and `ValueObjectTransformer` rebuilds
//! immutable value objects through declared factories on submit.

pub mod access;
pub mod error;
pub mod exception;
pub mod field;
pub mod instantiator;
pub mod logging;
pub mod mapper;
pub mod object;
pub mod signature;
pub mod transformer;
pub mod value;

pub use access::{DefaultPropertyAccessor, PropertyAccessor, PropertyPath};
pub use error::{
    AccessError, Failure, FieldError, MappingError, MappingResult, TransformError,
    TransformationFailed,
};
pub use exception::{
    ExceptionHandler, ExceptionHandlerRegistry, ExceptionTranslator, FormExceptionHandler,
};
pub use field::{
    FieldConfig, FieldNode, PropertyMapper, ReadPropertyPath, ReadStrategy, WritePropertyPath,
};
pub use instantiator::{Callable, ClassDescriptor, Factory, ViewDataInstantiator};
pub use logging::{default_log_level, init_logging, init_logging_from_env, logging_status};
pub use mapper::{DataMapper, FormDataMapper, PropertyPathMapper};
pub use object::DomainObject;
pub use signature::{Parameter, ParameterKind, Signature, Visibility};
pub use transformer::{DataTransformer, IntegerToStringTransformer, ValueObjectTransformer};
pub use value::{ObjectRef, Value, ValueMap};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
