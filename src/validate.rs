//! Shape checks that turn an untyped candidate into a typed item.
//!
//! A validator applies two rules: every required field is present with the
//! expected JSON type, and every required string is non-empty after trimming.
//! Which fields are required depends on the generation task, so the check is
//! a trait and callers pick the implementation.

use serde_json::{Map, Value};
use std::fmt;

/// Why a candidate was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotAnObject,
    MissingField(&'static str),
    WrongType {
        field: &'static str,
        expected: FieldKind,
    },
    BlankString(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotAnObject => write!(f, "candidate is not an object"),
            Rejection::MissingField(k) => write!(f, "missing field {:?}", k),
            Rejection::WrongType { field, expected } => {
                write!(f, "field {:?} is not a {}", field, expected)
            }
            Rejection::BlankString(k) => write!(f, "field {:?} is blank", k),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation<T> {
    Valid(T),
    Invalid(Rejection),
}

impl<T> Validation<T> {
    pub fn into_valid(self) -> Option<T> {
        match self {
            Validation::Valid(t) => Some(t),
            Validation::Invalid(_) => None,
        }
    }
}

pub trait Validator {
    type Item: Clone + PartialEq;

    fn validate(&self, candidate: &Value) -> Validation<Self::Item>;
}

impl<V: Validator + ?Sized> Validator for &V {
    type Item = V::Item;

    fn validate(&self, candidate: &Value) -> Validation<Self::Item> {
        (**self).validate(candidate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl FieldKind {
    fn matches(self, v: &Value) -> bool {
        match self {
            FieldKind::String => v.is_string(),
            FieldKind::Number => v.is_number(),
            FieldKind::Bool => v.is_boolean(),
            FieldKind::Array => v.is_array(),
            FieldKind::Object => v.is_object(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Check `field` on `obj` against both rules and hand back the value.
pub(crate) fn require<'v>(
    obj: &'v Map<String, Value>,
    field: &'static str,
    kind: FieldKind,
) -> Result<&'v Value, Rejection> {
    let v = obj.get(field).ok_or(Rejection::MissingField(field))?;
    if !kind.matches(v) {
        return Err(Rejection::WrongType {
            field,
            expected: kind,
        });
    }
    if let Value::String(s) = v {
        if s.trim().is_empty() {
            return Err(Rejection::BlankString(field));
        }
    }
    Ok(v)
}

/// Validator assembled from a list of required fields, for generation tasks
/// without a dedicated item type (outlines, episode plans). Accepted items are
/// the candidate's full object, extra fields included.
#[derive(Debug, Clone, Default)]
pub struct FieldsValidator {
    fields: Vec<(&'static str, FieldKind)>,
}

impl FieldsValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, field: &'static str, kind: FieldKind) -> Self {
        self.fields.push((field, kind));
        self
    }
}

impl Validator for FieldsValidator {
    type Item = Map<String, Value>;

    fn validate(&self, candidate: &Value) -> Validation<Self::Item> {
        let Some(obj) = candidate.as_object() else {
            return Validation::Invalid(Rejection::NotAnObject);
        };
        for &(field, kind) in &self.fields {
            if let Err(r) = require(obj, field, kind) {
                return Validation::Invalid(r);
            }
        }
        Validation::Valid(obj.clone())
    }
}
