//! Field nodes, their binding options and the minimal processing pipeline.
//!
//! # Responsibility
//! - Hold per-field binding configuration (read/write paths, property
//!   mapper, factory argument, by-reference flag).
//! - Carry submission state (`submitted`, `synchronized`, `disabled`).
//! - Run transformers and child mapping on `set_data` / `submit`.
//!
//! # Invariants
//! - A failed reverse transformation keeps the previous model data and the
//!   submitted view data, and marks the field desynchronized.
//! - Read precedence for explicit options is closure > path > mapper.

use crate::access::{PropertyAccessor, PropertyPath};
use crate::error::{
    Failure, FieldError, MappingError, MappingResult, TransformError, TransformationFailed,
};
use crate::instantiator::Factory;
use crate::mapper::FormDataMapper;
use crate::transformer::DataTransformer;
use crate::value::{Value, ValueMap};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Unary accessor closure: `(object) -> value`.
pub type ReadFn = Rc<dyn Fn(&Value) -> Result<Value, Failure>>;
/// Binary writer closure: `(object, value)`.
pub type WriteFn = Rc<dyn Fn(&mut Value, Value) -> Result<(), Failure>>;

/// Source of a field's display value.
#[derive(Clone)]
pub enum ReadPropertyPath {
    Path(PropertyPath),
    Accessor(ReadFn),
}

impl ReadPropertyPath {
    pub fn path(path: impl Into<PropertyPath>) -> Self {
        Self::Path(path.into())
    }

    pub fn accessor(read: impl Fn(&Value) -> Result<Value, Failure> + 'static) -> Self {
        Self::Accessor(Rc::new(read))
    }
}

impl Debug for ReadPropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "Path({path})"),
            Self::Accessor(_) => write!(f, "Accessor(<closure>)"),
        }
    }
}

/// Target of a field's submitted value.
///
/// A `Path` shared by several fields names a multi-argument method of the
/// bound object instead of a settable property.
#[derive(Clone)]
pub enum WritePropertyPath {
    Path(PropertyPath),
    Writer(WriteFn),
}

impl WritePropertyPath {
    pub fn path(path: impl Into<PropertyPath>) -> Self {
        Self::Path(path.into())
    }

    pub fn writer(write: impl Fn(&mut Value, Value) -> Result<(), Failure> + 'static) -> Self {
        Self::Writer(Rc::new(write))
    }
}

impl Debug for WritePropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "Path({path})"),
            Self::Writer(_) => write!(f, "Writer(<closure>)"),
        }
    }
}

/// Pluggable read/write logic replacing path-based access for one field.
pub trait PropertyMapper {
    fn read_property_value(&self, data: &Value) -> Result<Value, Failure>;
    fn write_property_value(&self, data: &mut Value, value: Value) -> Result<(), Failure>;
}

/// Resolved read option of a field, in precedence order.
pub enum ReadStrategy<'a> {
    Closure(&'a ReadFn),
    Path(&'a PropertyPath),
    Mapper(&'a dyn PropertyMapper),
    None,
}

impl<'a> ReadStrategy<'a> {
    pub fn of(config: &'a FieldConfig) -> Self {
        match (&config.read_property_path, &config.property_mapper) {
            (Some(ReadPropertyPath::Accessor(read)), _) => Self::Closure(read),
            (Some(ReadPropertyPath::Path(path)), _) => Self::Path(path),
            (None, Some(mapper)) => Self::Mapper(mapper.as_ref()),
            (None, None) => Self::None,
        }
    }

    /// Reads through the strategy; `None` strategy reads as `Null`.
    pub fn read(&self, data: &Value, accessor: &dyn PropertyAccessor) -> Result<Value, Failure> {
        match self {
            Self::Closure(read) => read(data),
            Self::Path(path) => accessor.get_value(data, path),
            Self::Mapper(mapper) => mapper.read_property_value(data),
            Self::None => Ok(Value::Null),
        }
    }
}

/// Binding options of one field.
#[derive(Clone)]
pub struct FieldConfig {
    pub mapped: bool,
    pub disabled: bool,
    pub compound: bool,
    pub by_reference: bool,
    pub property_path: Option<PropertyPath>,
    pub read_property_path: Option<ReadPropertyPath>,
    pub write_property_path: Option<WritePropertyPath>,
    pub property_mapper: Option<Rc<dyn PropertyMapper>>,
    pub factory_argument: Option<String>,
    pub factory: Option<Factory>,
    /// Data used when no bound data is available.
    pub data: Value,
    pub exception_handling_strategy: Vec<String>,
    pub expected_exception: Vec<String>,
    pub data_mapper: Option<Rc<dyn FormDataMapper>>,
    pub view_transformers: Vec<Rc<dyn DataTransformer>>,
    pub model_transformers: Vec<Rc<dyn DataTransformer>>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            mapped: true,
            disabled: false,
            compound: false,
            by_reference: true,
            property_path: None,
            read_property_path: None,
            write_property_path: None,
            property_mapper: None,
            factory_argument: None,
            factory: None,
            data: Value::Null,
            exception_handling_strategy: Vec::new(),
            expected_exception: Vec::new(),
            data_mapper: None,
            view_transformers: Vec::new(),
            model_transformers: Vec::new(),
        }
    }
}

impl Debug for FieldConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldConfig")
            .field("mapped", &self.mapped)
            .field("disabled", &self.disabled)
            .field("compound", &self.compound)
            .field("by_reference", &self.by_reference)
            .field("property_path", &self.property_path)
            .field("read_property_path", &self.read_property_path)
            .field("write_property_path", &self.write_property_path)
            .field("property_mapper", &self.property_mapper.is_some())
            .field("factory_argument", &self.factory_argument)
            .field("factory", &self.factory)
            .field("exception_handling_strategy", &self.exception_handling_strategy)
            .field("expected_exception", &self.expected_exception)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Input,
    Button,
}

/// One node of the field tree.
#[derive(Debug)]
pub struct FieldNode {
    name: String,
    kind: FieldKind,
    config: FieldConfig,
    children: Vec<FieldNode>,
    data: Value,
    norm_data: Value,
    view_data: Value,
    submitted: bool,
    synchronized: bool,
    transformation_failure: Option<TransformationFailed>,
    errors: Vec<FieldError>,
}

impl FieldNode {
    /// Creates a field holding its configured data; call `set_data` to run
    /// transformers and populate children.
    pub fn new(name: impl Into<String>, config: FieldConfig) -> Self {
        let data = config.data.clone();
        Self {
            name: name.into(),
            kind: FieldKind::Input,
            config,
            children: Vec::new(),
            data,
            norm_data: Value::Null,
            view_data: Value::Null,
            submitted: false,
            synchronized: true,
            transformation_failure: None,
            errors: Vec::new(),
        }
    }

    /// Creates a button; buttons are never mapped.
    pub fn button(name: impl Into<String>) -> Self {
        let mut node = Self::new(
            name,
            FieldConfig {
                mapped: false,
                ..FieldConfig::default()
            },
        );
        node.kind = FieldKind::Button;
        node
    }

    pub fn with_child(mut self, child: FieldNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: FieldNode) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_button(&self) -> bool {
        self.kind == FieldKind::Button
    }

    pub fn is_compound(&self) -> bool {
        self.config.compound
    }

    pub fn is_mapped(&self) -> bool {
        self.config.mapped
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn norm_data(&self) -> &Value {
        &self.norm_data
    }

    pub fn view_data(&self) -> &Value {
        &self.view_data
    }

    pub fn transformation_failure(&self) -> Option<&TransformationFailed> {
        self.transformation_failure.as_ref()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&FieldNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FieldNode> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Assigns model data, derives norm/view data and maps view data into
    /// the children of a compound field.
    pub fn set_data(&mut self, data: Value) -> MappingResult<()> {
        let mut norm = data.clone();
        for transformer in self.config.model_transformers.clone() {
            norm = transformer.transform(self, norm).map_err(transform_error)?;
        }
        let mut view = norm.clone();
        for transformer in self.config.view_transformers.clone() {
            view = transformer.transform(self, view).map_err(transform_error)?;
        }

        self.data = data;
        self.norm_data = norm;
        self.view_data = view;

        if self.is_compound() {
            if let Some(mapper) = self.config.data_mapper.clone() {
                let mut children: Vec<&mut FieldNode> = self.children.iter_mut().collect();
                mapper.map_data_to_forms(&self.view_data, &mut children)?;
            }
        }

        Ok(())
    }

    /// Submits a raw value (a map of child values for compound fields).
    ///
    /// Disabled fields are marked submitted but keep their data.
    pub fn submit(&mut self, submitted: Value) -> MappingResult<()> {
        self.submitted = true;
        if self.is_disabled() {
            return Ok(());
        }
        self.synchronized = true;
        self.transformation_failure = None;

        let view = if self.is_compound() {
            for child in &mut self.children {
                let child_value = submitted.get(child.name.as_str()).cloned().unwrap_or_default();
                child.submit(child_value)?;
            }

            let mut view = if self.view_data.is_null() {
                Value::Map(ValueMap::new())
            } else {
                self.view_data.clone()
            };
            if let Some(mapper) = self.config.data_mapper.clone() {
                let mut children: Vec<&mut FieldNode> = self.children.iter_mut().collect();
                mapper.map_forms_to_data(&mut children, &mut view)?;
            }
            view
        } else {
            submitted
        };
        self.view_data = view.clone();

        let mut norm = view;
        for transformer in self.config.view_transformers.clone().iter().rev() {
            norm = match transformer.reverse_transform(self, norm) {
                Ok(value) => value,
                Err(err) => return self.desynchronize(err),
            };
        }
        let mut model = norm.clone();
        for transformer in self.config.model_transformers.clone().iter().rev() {
            model = match transformer.reverse_transform(self, model) {
                Ok(value) => value,
                Err(err) => return self.desynchronize(err),
            };
        }

        self.norm_data = norm;
        self.data = model;
        Ok(())
    }

    fn desynchronize(&mut self, err: TransformError) -> MappingResult<()> {
        match err {
            TransformError::Failed(failed) => {
                debug!(
                    "event=field_desynchronized module=field status=failed field={}",
                    self.name
                );
                self.synchronized = false;
                self.transformation_failure = Some(failed);
                Ok(())
            }
            TransformError::Failure(failure) => Err(MappingError::Failure(failure)),
        }
    }
}

fn transform_error(err: TransformError) -> MappingError {
    match err {
        TransformError::Failed(failed) => MappingError::Transformation(failed),
        TransformError::Failure(failure) => MappingError::Failure(failure),
    }
}
