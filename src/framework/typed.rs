//! # Typed Attributes
//!
//! A [`TypedAttribute`] reads a plain attribute and makes sure the emitted value has
//! the declared [`AttributeType`].
//!
//! - With a converter, the converter's result is emitted verbatim.
//! - Without one, a matching value passes through untouched and a mismatching value
//!   gets exactly one canonical coercion (`"42"` -> `42` for [`AttributeType::Integer`]).
//!   When no coercion exists for the pair, resolution fails with
//!   [`SerializeError::TypeMismatch`].

use crate::framework::error::SerializeError;
use crate::framework::source::{BoxError, Source};
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

/// The semantic type declared for a typed attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::String => "String",
            AttributeType::Integer => "Integer",
            AttributeType::Float => "Float",
            AttributeType::Boolean => "Boolean",
            AttributeType::Array => "Array",
            AttributeType::Object => "Object",
        };
        f.write_str(name)
    }
}

impl AttributeType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Integer => value.is_i64() || value.is_u64(),
            AttributeType::Float => value.is_f64(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Array => value.is_array(),
            AttributeType::Object => value.is_object(),
        }
    }

    /// The single canonical coercion for this type, if one exists for `value`.
    fn coerce(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (AttributeType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (AttributeType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
            (AttributeType::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(Value::from)
            }
            (AttributeType::Integer, Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::from(f as i64)),
            (AttributeType::Float, Value::Number(n)) => {
                n.as_f64().and_then(Number::from_f64).map(Value::Number)
            }
            (AttributeType::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            (AttributeType::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Custom conversion applied to the raw value of a typed attribute.
pub type Converter = Arc<dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync>;

/// An attribute with a declared type and an optional converter.
#[derive(Clone)]
pub struct TypedAttribute {
    name: String,
    ty: AttributeType,
    converter: Option<Converter>,
    nullable: bool,
}

impl TypedAttribute {
    pub fn new(name: impl Into<String>, ty: AttributeType) -> Self {
        Self {
            name: name.into(),
            ty,
            converter: None,
            nullable: false,
        }
    }

    /// Replaces the canonical coercion with `converter`.
    pub fn converter(
        mut self,
        converter: impl Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Lets `null` through instead of reporting a mismatch.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> AttributeType {
        self.ty
    }

    /// Reads the attribute from `object` and coerces it.
    pub fn value(&self, object: &dyn Source) -> Result<Value, SerializeError> {
        let raw = object.read(&self.name).map_err(|source| SerializeError::Read {
            attribute: self.name.clone(),
            source,
        })?;
        self.coerce(raw)
    }

    pub fn coerce(&self, raw: Value) -> Result<Value, SerializeError> {
        if let Some(converter) = &self.converter {
            return converter(&raw).map_err(|e| self.mismatch(format!("converter failed: {e}")));
        }
        if self.ty.matches(&raw) || (self.nullable && raw.is_null()) {
            return Ok(raw);
        }
        self.ty
            .coerce(&raw)
            .ok_or_else(|| self.mismatch(format!("found {} `{}`", kind_of(&raw), raw)))
    }

    fn mismatch(&self, detail: String) -> SerializeError {
        SerializeError::TypeMismatch {
            attribute: self.name.clone(),
            expected: self.ty,
            detail,
        }
    }
}

impl fmt::Debug for TypedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAttribute")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("converter", &self.converter.is_some())
            .field("nullable", &self.nullable)
            .finish()
    }
}
