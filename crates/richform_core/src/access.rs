//! Property path evaluation over maps, lists and domain objects.
//!
//! # Responsibility
//! - Parse property paths (`amount`, `price.amount`, `[amount]`, `lines[0].sku`).
//! - Read and write values along a path through the `PropertyAccessor` seam.
//!
//! # Invariants
//! - Reading a missing map key yields `Null`; traversing through a scalar or
//!   `Null` is an `AccessError::UnexpectedType`.
//! - Writes through an intermediate map or list are written back to the
//!   parent; writes through an intermediate object mutate it in place.

use crate::error::{AccessError, Failure};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*|\[[^\[\]]+\])(?:\.[A-Za-z_][A-Za-z0-9_]*|\[[^\[\]]+\])*$")
        .expect("valid property path regex")
});
static ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)|\[([^\[\]]+)\]").expect("valid path element regex")
});

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElement {
    Property(String),
    Index(String),
}

impl PathElement {
    fn key(&self) -> &str {
        match self {
            Self::Property(key) | Self::Index(key) => key.as_str(),
        }
    }
}

/// Raw property path; parsed on use so malformed paths surface as failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyPath(String);

impl PropertyPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the path into elements.
    pub fn elements(&self) -> Result<Vec<PathElement>, AccessError> {
        if !PATH_RE.is_match(&self.0) {
            return Err(AccessError::InvalidPath {
                path: self.0.clone(),
            });
        }

        Ok(ELEMENT_RE
            .captures_iter(&self.0)
            .filter_map(|captures| {
                if let Some(name) = captures.get(1) {
                    Some(PathElement::Property(name.as_str().to_string()))
                } else {
                    captures
                        .get(2)
                        .map(|index| PathElement::Index(index.as_str().to_string()))
                }
            })
            .collect())
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PropertyPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Path-based get/set capability.
pub trait PropertyAccessor {
    fn get_value(&self, target: &Value, path: &PropertyPath) -> Result<Value, Failure>;
    fn set_value(&self, target: &mut Value, path: &PropertyPath, value: Value)
        -> Result<(), Failure>;
}

/// Default evaluator for maps, lists and `DomainObject` properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertyAccessor;

impl DefaultPropertyAccessor {
    pub fn new() -> Self {
        Self
    }
}

impl PropertyAccessor for DefaultPropertyAccessor {
    fn get_value(&self, target: &Value, path: &PropertyPath) -> Result<Value, Failure> {
        let elements = path.elements()?;
        let mut current = target.clone();
        for element in &elements {
            current = read_element(&current, element, path)?;
        }
        Ok(current)
    }

    fn set_value(
        &self,
        target: &mut Value,
        path: &PropertyPath,
        value: Value,
    ) -> Result<(), Failure> {
        let elements = path.elements()?;
        write_path(target, &elements, value, path)
    }
}

fn read_element(target: &Value, element: &PathElement, path: &PropertyPath) -> Result<Value, Failure> {
    match target {
        Value::Map(entries) => Ok(entries.get(element.key()).cloned().unwrap_or_default()),
        Value::List(items) => match element {
            PathElement::Index(key) => Ok(key
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index).cloned())
                .unwrap_or_default()),
            PathElement::Property(_) => Err(unexpected_type(path, target)),
        },
        Value::Object(object) => {
            let borrowed = object.borrow();
            let value = borrowed.read_property(element.key()).ok_or_else(|| {
                Failure::Access(AccessError::NoSuchProperty {
                    class: borrowed.class_name().to_string(),
                    property: element.key().to_string(),
                })
            });
            value
        }
        _ => Err(unexpected_type(path, target)),
    }
}

fn write_element(
    target: &mut Value,
    element: &PathElement,
    value: Value,
    path: &PropertyPath,
) -> Result<(), Failure> {
    match target {
        Value::Map(entries) => {
            entries.insert(element.key().to_string(), value);
            Ok(())
        }
        Value::List(items) => {
            let index = match element {
                PathElement::Index(key) => key.parse::<usize>().ok(),
                PathElement::Property(_) => None,
            };
            match index {
                Some(index) if index < items.len() => {
                    items[index] = value;
                    Ok(())
                }
                Some(index) if index == items.len() => {
                    items.push(value);
                    Ok(())
                }
                _ => Err(Failure::Access(AccessError::InvalidPath {
                    path: path.as_str().to_string(),
                })),
            }
        }
        Value::Object(object) => object.borrow_mut().write_property(element.key(), value),
        _ => Err(unexpected_type(path, target)),
    }
}

fn write_path(
    target: &mut Value,
    elements: &[PathElement],
    value: Value,
    path: &PropertyPath,
) -> Result<(), Failure> {
    let Some((first, rest)) = elements.split_first() else {
        return Err(Failure::Access(AccessError::InvalidPath {
            path: path.as_str().to_string(),
        }));
    };

    if rest.is_empty() {
        return write_element(target, first, value, path);
    }

    let mut child = read_element(target, first, path)?;
    if child.is_null() && target.is_map() {
        child = Value::Map(Default::default());
    }
    write_path(&mut child, rest, value, path)?;

    // Objects were mutated in place; containers are values and must be stored back.
    if child.is_object() {
        return Ok(());
    }
    write_element(target, first, child, path)
}

fn unexpected_type(path: &PropertyPath, target: &Value) -> Failure {
    Failure::Access(AccessError::UnexpectedType {
        path: path.as_str().to_string(),
        given: target.kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::{DefaultPropertyAccessor, PathElement, PropertyAccessor, PropertyPath};
    use crate::error::{AccessError, Failure};
    use crate::object::DomainObject;
    use crate::value::Value;
    use std::any::Any;

    #[derive(Debug)]
    struct Customer {
        name: String,
        address: Value,
    }

    impl DomainObject for Customer {
        fn class_name(&self) -> &str {
            "Customer"
        }

        fn read_property(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.as_str())),
                "address" => Some(self.address.clone()),
                _ => None,
            }
        }

        fn write_property(&mut self, name: &str, value: Value) -> Result<(), Failure> {
            match (name, value) {
                ("name", Value::String(value)) => {
                    self.name = value;
                    Ok(())
                }
                ("address", value) => {
                    self.address = value;
                    Ok(())
                }
                (other, _) => Err(Failure::Access(AccessError::NotWritable {
                    class: "Customer".to_string(),
                    property: other.to_string(),
                })),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn customer() -> Value {
        Value::object(Customer {
            name: "Ada".to_string(),
            address: Value::map([("city", "London")]),
        })
    }

    #[test]
    fn parses_dotted_and_indexed_paths() {
        let elements = PropertyPath::new("lines[0].sku")
            .elements()
            .expect("path should parse");
        assert_eq!(
            elements,
            vec![
                PathElement::Property("lines".to_string()),
                PathElement::Index("0".to_string()),
                PathElement::Property("sku".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for raw in ["", "a..b", ".a", "a.", "a[", "1abc"] {
            let err = PropertyPath::new(raw)
                .elements()
                .expect_err("malformed path must be rejected");
            assert!(matches!(err, AccessError::InvalidPath { .. }), "path `{raw}`");
        }
    }

    #[test]
    fn reads_object_and_nested_map_values() {
        let accessor = DefaultPropertyAccessor::new();
        let target = customer();

        assert_eq!(
            accessor
                .get_value(&target, &"name".into())
                .expect("name should be readable"),
            Value::from("Ada")
        );
        assert_eq!(
            accessor
                .get_value(&target, &"address.city".into())
                .expect("nested city should be readable"),
            Value::from("London")
        );
        assert_eq!(
            accessor
                .get_value(&target, &"address[zip]".into())
                .expect("missing map key reads as null"),
            Value::Null
        );
    }

    #[test]
    fn unknown_object_property_fails() {
        let err = DefaultPropertyAccessor::new()
            .get_value(&customer(), &"email".into())
            .expect_err("unknown property must fail");
        assert!(matches!(
            err,
            Failure::Access(AccessError::NoSuchProperty { .. })
        ));
    }

    #[test]
    fn traversing_through_null_fails() {
        let err = DefaultPropertyAccessor::new()
            .get_value(&Value::map([("a", Value::Null)]), &"a.b".into())
            .expect_err("null intermediate must fail");
        assert!(matches!(
            err,
            Failure::Access(AccessError::UnexpectedType { given: "null", .. })
        ));
    }

    #[test]
    fn writes_nested_map_inside_object() {
        let accessor = DefaultPropertyAccessor::new();
        let mut target = customer();

        accessor
            .set_value(&mut target, &"address.city".into(), Value::from("Paris"))
            .expect("nested write should succeed");

        assert_eq!(
            accessor
                .get_value(&target, &"address.city".into())
                .expect("city should be readable"),
            Value::from("Paris")
        );
    }

    #[test]
    fn writes_create_missing_map_levels() {
        let accessor = DefaultPropertyAccessor::new();
        let mut target = Value::map(Vec::<(String, Value)>::new());

        accessor
            .set_value(&mut target, &"price.amount".into(), Value::Int(650))
            .expect("write should create intermediate map");

        assert_eq!(
            target.get("price").and_then(|price| price.get("amount")),
            Some(&Value::Int(650))
        );
    }

    #[test]
    fn writes_append_to_lists() {
        let accessor = DefaultPropertyAccessor::new();
        let mut target = Value::map([("tags", Value::List(vec![Value::from("a")]))]);

        accessor
            .set_value(&mut target, &"tags[1]".into(), Value::from("b"))
            .expect("append should succeed");
        let err = accessor
            .set_value(&mut target, &"tags[5]".into(), Value::from("z"))
            .expect_err("gap index must fail");

        assert!(matches!(err, Failure::Access(AccessError::InvalidPath { .. })));
        assert_eq!(
            target.get("tags"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
    }
}
