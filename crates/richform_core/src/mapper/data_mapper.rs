//! Policy-driven data mapper decorating a fallback mapper.
//!
//! # Responsibility
//! - Resolve display values from accessor closures, read paths, property
//!   mappers or factory arguments before deferring to the fallback.
//! - Write submitted values through writer closures, property mappers,
//!   single paths, or one multi-argument method call per write group.
//!
//! # Invariants
//! - Unmapped, unsubmitted, desynchronized and disabled fields are never
//!   written here; they are forwarded to the fallback mapper.
//! - Write failures are isolated per field through the exception handler;
//!   an untranslated failure aborts the pass.
//! - A write group with several fields either binds every declared
//!   parameter or fails with a configuration error before any call.

use crate::access::{PropertyAccessor, PropertyPath};
use crate::error::{Failure, MappingError, MappingResult};
use crate::exception::FormExceptionHandler;
use crate::field::{
    FieldNode, PropertyMapper, ReadPropertyPath, ReadStrategy, WriteFn, WritePropertyPath,
};
use crate::mapper::{ensure_bindable, FormDataMapper};
use crate::value::{Value, ValueMap};
use log::{debug, warn};
use std::rc::Rc;

/// Fields sharing one write target, by index into the mapped batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteGroup {
    pub target: PropertyPath,
    pub fields: Vec<usize>,
}

/// Route chosen for one field during write-back.
enum WriteRoute {
    Fallback,
    Writer(WriteFn),
    Mapper(Rc<dyn PropertyMapper>),
    Group(PropertyPath),
}

/// Data mapper applying explicit binding options before a fallback mapper.
pub struct DataMapper {
    fallback: Rc<dyn FormDataMapper>,
    accessor: Rc<dyn PropertyAccessor>,
    exception_handler: FormExceptionHandler,
}

impl DataMapper {
    pub fn new(
        fallback: Rc<dyn FormDataMapper>,
        accessor: Rc<dyn PropertyAccessor>,
        exception_handler: FormExceptionHandler,
    ) -> Self {
        Self {
            fallback,
            accessor,
            exception_handler,
        }
    }

    /// Resolves the display value of one field, or `None` to defer it.
    fn resolve_display_value(
        &self,
        field: &FieldNode,
        data: &Value,
        is_empty: bool,
    ) -> Result<Option<Value>, Failure> {
        let config = field.config();
        let value = match (&config.read_property_path, &config.property_mapper) {
            (Some(ReadPropertyPath::Accessor(read)), _) if !is_empty && config.mapped => read(data)?,
            (Some(ReadPropertyPath::Path(path)), _) if !is_empty && config.mapped => {
                self.accessor.get_value(data, path)?
            }
            (_, Some(mapper)) if !is_empty => mapper.read_property_value(data)?,
            (Some(_), _) => config.data.clone(),
            (None, _) if config.factory_argument.is_some() => {
                data.get(field.name()).cloned().unwrap_or_default()
            }
            (None, _) => return Ok(None),
        };
        Ok(Some(value))
    }

    fn route_for(&self, field: &FieldNode, data: &Value, previous: &Value) -> WriteRoute {
        let config = field.config();
        let write = &config.write_property_path;

        if write.is_none() && config.property_mapper.is_none() {
            return WriteRoute::Fallback;
        }
        if !config.mapped || !field.is_submitted() || !field.is_synchronized() || field.is_disabled()
        {
            debug!(
                "event=write_suppressed module=data_mapper status=forwarded field={}",
                field.name()
            );
            return WriteRoute::Fallback;
        }
        let is_writer = matches!(write, Some(WritePropertyPath::Writer(_)));
        if data.is_object() && config.by_reference && field.data().is_identical(previous) && !is_writer
        {
            debug!(
                "event=write_skipped module=data_mapper status=unchanged field={}",
                field.name()
            );
            return WriteRoute::Fallback;
        }

        match (write, &config.property_mapper) {
            (Some(WritePropertyPath::Writer(write)), _) => WriteRoute::Writer(write.clone()),
            (_, Some(mapper)) => WriteRoute::Mapper(mapper.clone()),
            (Some(WritePropertyPath::Path(path)), None) => WriteRoute::Group(path.clone()),
            (None, None) => WriteRoute::Fallback,
        }
    }

    fn write_field(
        &self,
        field: &mut FieldNode,
        route: WriteRoute,
        data: &mut Value,
    ) -> MappingResult<Option<PropertyPath>> {
        let result = match route {
            WriteRoute::Group(path) => return Ok(Some(path)),
            WriteRoute::Fallback => match self.fallback.map_forms_to_data(&mut [&mut *field], data) {
                Ok(()) => Ok(()),
                Err(MappingError::Failure(failure)) => Err(failure),
                Err(other) => return Err(other),
            },
            WriteRoute::Writer(write) => write(&mut *data, field.data().clone()),
            WriteRoute::Mapper(mapper) => mapper.write_property_value(data, field.data().clone()),
        };

        match result {
            Ok(()) => Ok(None),
            Err(failure) => self.handle_failure(field, data, failure).map(|()| None),
        }
    }

    fn handle_failure(
        &self,
        field: &mut FieldNode,
        data: &Value,
        failure: Failure,
    ) -> MappingResult<()> {
        self.exception_handler
            .handle_exception(field, data, failure)
            .map_err(MappingError::Failure)
    }

    fn resolve_group(
        &self,
        group: &WriteGroup,
        fields: &mut [&mut FieldNode],
        data: &mut Value,
    ) -> MappingResult<()> {
        let result = if let [index] = group.fields.as_slice() {
            let value = fields[*index].data().clone();
            self.accessor.set_value(data, &group.target, value)
        } else {
            let arguments = self.bind_group_arguments(group, fields, data)?;
            match data.as_object() {
                Some(object) => object
                    .borrow_mut()
                    .call_method(group.target.as_str(), arguments),
                None => Ok(()),
            }
        };

        let Err(failure) = result else {
            return Ok(());
        };
        for &index in &group.fields {
            self.handle_failure(&mut *fields[index], data, failure.clone())?;
        }
        Ok(())
    }

    /// Orders the group's values by the target method's declared parameters.
    fn bind_group_arguments(
        &self,
        group: &WriteGroup,
        fields: &[&mut FieldNode],
        data: &Value,
    ) -> MappingResult<Vec<Value>> {
        let field_names = || {
            group
                .fields
                .iter()
                .map(|&index| fields[index].name().to_string())
                .collect::<Vec<_>>()
        };

        let Some(object) = data.as_object() else {
            return Err(configuration_error(
                field_names(),
                format!(
                    "Mapping multiple forms to a single method requires the form data to be an object but is \"{}\"",
                    data.kind()
                ),
            ));
        };

        let signature = {
            let borrowed = object.borrow();
            let signature = borrowed.signature(group.target.as_str());
            match signature {
                Some(signature) => signature,
                None => {
                    let class = borrowed.class_name().to_string();
                    return Err(configuration_error(
                        field_names(),
                        format!(
                            "method \"{}\" is not declared on \"{}\"",
                            group.target, class
                        ),
                    ));
                }
            }
        };

        let values: ValueMap = group
            .fields
            .iter()
            .map(|&index| (fields[index].name().to_string(), fields[index].data().clone()))
            .collect();

        signature
            .names()
            .map(|name| {
                values.get(name).cloned().ok_or_else(|| {
                    configuration_error(
                        field_names(),
                        format!(
                            "parameter \"{name}\" of method \"{}\" has no matching field",
                            group.target
                        ),
                    )
                })
            })
            .collect()
    }
}

impl FormDataMapper for DataMapper {
    fn map_data_to_forms(
        &self,
        data: &Value,
        fields: &mut [&mut FieldNode],
    ) -> MappingResult<()> {
        ensure_bindable(data)?;
        let is_empty = data.is_empty_data();

        let mut deferred: Vec<&mut FieldNode> = Vec::new();
        for field in fields.iter_mut() {
            match self.resolve_display_value(&**field, data, is_empty)? {
                Some(value) => field.set_data(value)?,
                None => deferred.push(&mut **field),
            }
        }

        debug!(
            "event=map_data_to_forms module=data_mapper status=ok deferred={} data_kind={}",
            deferred.len(),
            data.kind()
        );
        self.fallback.map_data_to_forms(data, &mut deferred)
    }

    /// Writes submitted field values back into `data`.
    ///
    /// Write groups are resolved one after another once every other field
    /// has been routed. A group either performs its single method call or
    /// writes nothing, but a configuration error in a later group does not
    /// undo writes already made for earlier fields or groups.
    fn map_forms_to_data(
        &self,
        fields: &mut [&mut FieldNode],
        data: &mut Value,
    ) -> MappingResult<()> {
        if data.is_null() {
            return Ok(());
        }
        ensure_bindable(data)?;

        let mut groups: Vec<WriteGroup> = Vec::new();
        for index in 0..fields.len() {
            let previous = ReadStrategy::of(fields[index].config())
                .read(data, self.accessor.as_ref())?;
            let route = self.route_for(&*fields[index], data, &previous);

            if let Some(target) = self.write_field(&mut *fields[index], route, data)? {
                match groups.iter_mut().find(|group| group.target == target) {
                    Some(group) => group.fields.push(index),
                    None => groups.push(WriteGroup {
                        target,
                        fields: vec![index],
                    }),
                }
            }
        }

        for group in &groups {
            self.resolve_group(group, fields, data)?;
        }

        Ok(())
    }
}

fn configuration_error(fields: Vec<String>, message: String) -> MappingError {
    warn!(
        "event=write_group_rejected module=data_mapper status=error fields={}",
        fields.join(",")
    );
    MappingError::Configuration { fields, message }
}
