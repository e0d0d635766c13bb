//! Generic path-based mapper used when a field declares no explicit binding.

use crate::access::{PropertyAccessor, PropertyPath};
use crate::error::MappingResult;
use crate::field::FieldNode;
use crate::mapper::{ensure_bindable, FormDataMapper};
use crate::value::Value;
use log::debug;
use std::rc::Rc;

/// Maps each field through `property_path`, defaulting to the field name.
pub struct PropertyPathMapper {
    accessor: Rc<dyn PropertyAccessor>,
}

impl PropertyPathMapper {
    pub fn new(accessor: Rc<dyn PropertyAccessor>) -> Self {
        Self { accessor }
    }

    fn path_of(field: &FieldNode) -> PropertyPath {
        field
            .config()
            .property_path
            .clone()
            .unwrap_or_else(|| PropertyPath::new(field.name()))
    }
}

impl FormDataMapper for PropertyPathMapper {
    fn map_data_to_forms(
        &self,
        data: &Value,
        fields: &mut [&mut FieldNode],
    ) -> MappingResult<()> {
        ensure_bindable(data)?;
        let is_empty = data.is_empty_data();

        for field in fields.iter_mut() {
            if !is_empty && field.is_mapped() && !field.is_button() {
                let value = self.accessor.get_value(data, &Self::path_of(field))?;
                field.set_data(value)?;
            } else {
                let configured = field.config().data.clone();
                field.set_data(configured)?;
            }
        }

        Ok(())
    }

    fn map_forms_to_data(
        &self,
        fields: &mut [&mut FieldNode],
        data: &mut Value,
    ) -> MappingResult<()> {
        if data.is_null() {
            return Ok(());
        }
        ensure_bindable(data)?;

        for field in fields.iter() {
            if !field.is_mapped()
                || !field.is_submitted()
                || !field.is_synchronized()
                || field.is_disabled()
                || field.is_button()
            {
                continue;
            }

            let path = Self::path_of(field);
            if data.is_object() && field.config().by_reference {
                // Write-only properties have no previous value to compare.
                let previous = self.accessor.get_value(data, &path).ok();
                if previous.is_some_and(|previous| field.data().is_identical(&previous)) {
                    debug!(
                        "event=write_skipped module=property_path_mapper status=unchanged field={}",
                        field.name()
                    );
                    continue;
                }
            }

            self.accessor.set_value(data, &path, field.data().clone())?;
        }

        Ok(())
    }
}
