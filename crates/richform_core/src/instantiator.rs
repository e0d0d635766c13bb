//! Factory-driven construction of immutable objects from submitted values.
//!
//! # Responsibility
//! - Describe the three supported factory shapes: constructor, static
//!   factory method and closure.
//! - Bind submitted values to declared parameters and invoke the factory.
//!
//! # Invariants
//! - Arguments are passed in declared parameter order, never in submission
//!   order.
//! - Visibility, arity and parameter kinds are checked before the factory
//!   body runs.

use crate::error::Failure;
use crate::field::FieldNode;
use crate::signature::{ParameterKind, Signature, Visibility};
use crate::value::{Value, ValueMap};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Factory body receiving arguments in declared order.
pub type FactoryFn = Rc<dyn Fn(Vec<Value>) -> Result<Value, Failure>>;

/// A named body with a declared signature.
#[derive(Clone)]
pub struct Callable {
    name: String,
    signature: Signature,
    visibility: Visibility,
    body: FactoryFn,
}

impl Callable {
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn(Vec<Value>) -> Result<Value, Failure> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            signature,
            visibility: Visibility::Public,
            body: Rc::new(body),
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Checks visibility, arity and parameter kinds, then runs the body.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, Failure> {
        if self.visibility != Visibility::Public {
            return Err(Failure::NotInvocable {
                callable: self.name.clone(),
            });
        }
        if args.len() != self.signature.len() {
            return Err(Failure::ArgumentCount {
                callable: self.name.clone(),
                expected: self.signature.len(),
                given: args.len(),
            });
        }
        for (parameter, value) in self.signature.parameters().iter().zip(&args) {
            if !parameter.accepts(value) {
                return Err(Failure::ArgumentType {
                    parameter: parameter.name.clone(),
                    expected: parameter.kind.as_str(),
                    given: value.kind(),
                });
            }
        }

        (self.body)(args)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Constructor and static factory methods registered for one type.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: String,
    constructor: Option<Callable>,
    static_methods: BTreeMap<String, Callable>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            static_methods: BTreeMap::new(),
        }
    }

    pub fn with_constructor(
        mut self,
        signature: Signature,
        body: impl Fn(Vec<Value>) -> Result<Value, Failure> + 'static,
    ) -> Self {
        self.constructor = Some(Callable::new(format!("{}::new", self.name), signature, body));
        self
    }

    /// Registers a constructor that exists but cannot be called from outside.
    pub fn with_private_constructor(
        mut self,
        signature: Signature,
        body: impl Fn(Vec<Value>) -> Result<Value, Failure> + 'static,
    ) -> Self {
        self.constructor =
            Some(Callable::new(format!("{}::new", self.name), signature, body).private());
        self
    }

    pub fn with_static_method(
        mut self,
        method: &str,
        signature: Signature,
        body: impl Fn(Vec<Value>) -> Result<Value, Failure> + 'static,
    ) -> Self {
        let callable = Callable::new(format!("{}::{method}", self.name), signature, body);
        self.static_methods.insert(method.to_string(), callable);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructor(&self) -> Result<&Callable, Failure> {
        self.constructor
            .as_ref()
            .ok_or_else(|| Failure::NotInvocable {
                callable: format!("{}::new", self.name),
            })
    }

    pub fn static_method(&self, method: &str) -> Result<&Callable, Failure> {
        self.static_methods
            .get(method)
            .ok_or_else(|| Failure::UnknownMethod {
                class: self.name.clone(),
                method: method.to_string(),
            })
    }
}

/// How a value-object field builds a new instance.
#[derive(Debug, Clone)]
pub enum Factory {
    Class(Rc<ClassDescriptor>),
    StaticMethod {
        class: Rc<ClassDescriptor>,
        method: String,
    },
    Closure(Callable),
}

impl Factory {
    pub fn class(class: ClassDescriptor) -> Self {
        Self::Class(Rc::new(class))
    }

    pub fn static_method(class: Rc<ClassDescriptor>, method: impl Into<String>) -> Self {
        Self::StaticMethod {
            class,
            method: method.into(),
        }
    }

    pub fn closure(
        signature: Signature,
        body: impl Fn(Vec<Value>) -> Result<Value, Failure> + 'static,
    ) -> Self {
        Self::Closure(Callable::new("{closure}", signature, body))
    }

    /// Resolves the callable this factory invokes.
    pub fn callable(&self) -> Result<&Callable, Failure> {
        match self {
            Self::Class(class) => class.constructor(),
            Self::StaticMethod { class, method } => class.static_method(method),
            Self::Closure(callable) => Ok(callable),
        }
    }
}

/// Builds an object for `field` from its submitted view data.
pub struct ViewDataInstantiator<'a> {
    field: &'a FieldNode,
    view_data: Value,
}

impl<'a> ViewDataInstantiator<'a> {
    pub fn new(field: &'a FieldNode, view_data: Value) -> Self {
        Self { field, view_data }
    }

    pub fn instantiate_object(self) -> Result<Value, Failure> {
        let factory = self
            .field
            .config()
            .factory
            .as_ref()
            .ok_or_else(|| Failure::NotInvocable {
                callable: format!("factory of `{}`", self.field.name()),
            })?;
        let callable = factory.callable()?;
        let arguments = self.build_arguments(callable)?;
        callable.invoke(arguments)
    }

    fn build_arguments(&self, callable: &Callable) -> Result<Vec<Value>, Failure> {
        let parameters = callable.signature().parameters();

        if !self.field.is_compound() {
            return match parameters.len() {
                0 => Ok(Vec::new()),
                1 => Ok(vec![self.view_data.clone()]),
                expected => Err(Failure::ArgumentCount {
                    callable: callable.name().to_string(),
                    expected,
                    given: 1,
                }),
            };
        }

        let mut arguments = self.argument_map();
        if let [parameter] = parameters {
            if parameter.kind == ParameterKind::Map {
                return Ok(vec![Value::Map(arguments)]);
            }
        }

        parameters
            .iter()
            .map(|parameter| {
                arguments
                    .remove(parameter.name.as_str())
                    .ok_or_else(|| Failure::MissingArgument {
                        callable: callable.name().to_string(),
                        parameter: parameter.name.clone(),
                    })
            })
            .collect()
    }

    /// Submitted child values keyed by argument name (`factory_argument` or
    /// child name).
    fn argument_map(&self) -> ValueMap {
        let mut arguments = self.view_data.as_map().cloned().unwrap_or_default();
        for child in self.field.children() {
            let Some(argument) = &child.config().factory_argument else {
                continue;
            };
            if argument != child.name() {
                if let Some(value) = arguments.remove(child.name()) {
                    arguments.insert(argument.clone(), value);
                }
            }
        }
        arguments
    }
}
