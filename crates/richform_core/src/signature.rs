//! Declared call signatures for factories and multi-argument methods.
//!
//! Argument binding never inspects code at runtime: every constructor,
//! factory method, closure or domain-object method that receives bound field
//! values declares its ordered parameter list up front.

use crate::value::Value;

/// Call visibility of a registered callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Accepted value kind for one declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Any,
    Bool,
    Int,
    /// Accepts `Int` as well, mirroring numeric widening.
    Float,
    String,
    Map,
    Object,
}

impl ParameterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "mixed",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Map => "map",
            Self::Object => "object",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Int, Value::Int(_)) => true,
            (Self::Float, Value::Float(_) | Value::Int(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Map, Value::Map(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub nullable: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns whether `value` may be passed for this parameter.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.nullable && value.is_null()) || self.kind.accepts(value)
    }
}

/// Ordered parameter list of one callable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    /// Shorthand for a signature whose parameters all accept any value.
    pub fn untyped<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| Parameter::new(name, ParameterKind::Any))
                .collect(),
        )
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameter names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parameters.iter().map(|parameter| parameter.name.as_str())
    }
}
