//! Failure and error types shared by mappers, transformers and factories.
//!
//! # Responsibility
//! - `Failure`: what a domain object, accessor, mapper or factory raises.
//! - `FieldError`: the user-facing error a failure translates into.
//! - `MappingError` / `TransformError`: what a mapping or transformation
//!   call returns to the pipeline.
//!
//! # Invariants
//! - A `FieldError` never keeps a reference to the failure it came from.
//! - Configuration and type-mismatch errors are never downgraded to
//!   field errors.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Path traversal failures raised by a property accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    InvalidPath {
        path: String,
    },
    NoSuchProperty {
        class: String,
        property: String,
    },
    NotWritable {
        class: String,
        property: String,
    },
    UnexpectedType {
        path: String,
        given: &'static str,
    },
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { path } => write!(f, "invalid property path `{path}`"),
            Self::NoSuchProperty { class, property } => {
                write!(f, "property `{property}` does not exist on `{class}`")
            }
            Self::NotWritable { class, property } => {
                write!(f, "property `{property}` of `{class}` is not writable")
            }
            Self::UnexpectedType { path, given } => {
                write!(f, "cannot traverse `{path}`: expected object or map, got {given}")
            }
        }
    }
}

impl Error for AccessError {}

/// Failure raised while reading, writing or constructing domain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A domain invariant rejected the value; `kind` names the violation.
    Domain { kind: String, message: String },
    ArgumentType {
        parameter: String,
        expected: &'static str,
        given: &'static str,
    },
    ArgumentCount {
        callable: String,
        expected: usize,
        given: usize,
    },
    MissingArgument {
        callable: String,
        parameter: String,
    },
    NotInvocable {
        callable: String,
    },
    UnknownMethod {
        class: String,
        method: String,
    },
    Access(AccessError),
}

impl Failure {
    /// Convenience constructor for domain invariant violations.
    pub fn domain(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Domain {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Kind label matched against `expected_exception` field options.
    pub fn kind(&self) -> &str {
        match self {
            Self::Domain { kind, .. } => kind.as_str(),
            Self::ArgumentType { .. } => "ArgumentType",
            Self::ArgumentCount { .. } => "ArgumentCount",
            Self::MissingArgument { .. } => "MissingArgument",
            Self::NotInvocable { .. } => "NotInvocable",
            Self::UnknownMethod { .. } => "UnknownMethod",
            Self::Access(_) => "Access",
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain { message, .. } => write!(f, "{message}"),
            Self::ArgumentType {
                parameter,
                expected,
                given,
            } => write!(
                f,
                "argument `{parameter}` must be of type {expected}, {given} given"
            ),
            Self::ArgumentCount {
                callable,
                expected,
                given,
            } => write!(f, "`{callable}` expects {expected} argument(s), {given} given"),
            Self::MissingArgument {
                callable,
                parameter,
            } => write!(f, "no value bound to parameter `{parameter}` of `{callable}`"),
            Self::NotInvocable { callable } => write!(f, "`{callable}` is not publicly invocable"),
            Self::UnknownMethod { class, method } => {
                write!(f, "method `{method}` is not declared on `{class}`")
            }
            Self::Access(err) => write!(f, "{err}"),
        }
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Access(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AccessError> for Failure {
    fn from(value: AccessError) -> Self {
        Self::Access(value)
    }
}

/// User-facing field error: a message template plus substitution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message_template: String,
    /// Ordered `(placeholder, replacement)` pairs.
    pub parameters: Vec<(String, String)>,
}

impl FieldError {
    pub fn new(message_template: impl Into<String>) -> Self {
        Self {
            message_template: message_template.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(
        mut self,
        placeholder: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.parameters
            .push((placeholder.into(), replacement.into()));
        self
    }

    /// Substitutes every placeholder in the template.
    ///
    /// Each template position is replaced at most once, longest placeholder
    /// first, so replacements are never re-scanned.
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.message_template.len());
        let mut rest = self.message_template.as_str();

        'scan: while !rest.is_empty() {
            let mut best: Option<&(String, String)> = None;
            for pair in &self.parameters {
                if !pair.0.is_empty()
                    && rest.starts_with(pair.0.as_str())
                    && best.map_or(true, |current| pair.0.len() > current.0.len())
                {
                    best = Some(pair);
                }
            }
            if let Some((placeholder, replacement)) = best {
                rendered.push_str(replacement);
                rest = &rest[placeholder.len()..];
                continue 'scan;
            }
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                rendered.push(c);
            }
            rest = chars.as_str();
        }

        rendered
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Raised when a transformer cannot convert a value; desynchronizes the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationFailed {
    pub message: String,
    pub cause: Option<Failure>,
}

impl TransformationFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn caused_by(message: impl Into<String>, cause: Failure) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause),
        }
    }
}

impl Display for TransformationFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for TransformationFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Result of a transformer call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Translated into a user-facing message.
    Failed(TransformationFailed),
    /// No translation available; treated as a programming error.
    Failure(Failure),
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "{err}"),
            Self::Failure(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Failure(err) => Some(err),
        }
    }
}

impl From<TransformationFailed> for TransformError {
    fn from(value: TransformationFailed) -> Self {
        Self::Failed(value)
    }
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Pipeline-fatal outcome of a mapping pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    UnexpectedType {
        expected: &'static str,
        given: &'static str,
    },
    Configuration {
        fields: Vec<String>,
        message: String,
    },
    /// A failure the exception translation declined to handle.
    Failure(Failure),
    /// A value could not be transformed while populating a field.
    Transformation(TransformationFailed),
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedType { expected, given } => {
                write!(f, "expected argument of type \"{expected}\", \"{given}\" given")
            }
            Self::Configuration { fields, message } => {
                write!(f, "{message} (fields: {})", fields.join(", "))
            }
            Self::Failure(err) => write!(f, "{err}"),
            Self::Transformation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnexpectedType { .. } => None,
            Self::Configuration { .. } => None,
            Self::Failure(err) => Some(err),
            Self::Transformation(err) => Some(err),
        }
    }
}

impl From<Failure> for MappingError {
    fn from(value: Failure) -> Self {
        Self::Failure(value)
    }
}

impl From<AccessError> for MappingError {
    fn from(value: AccessError) -> Self {
        Self::Failure(Failure::Access(value))
    }
}
