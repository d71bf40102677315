//! Call-time arguments handed to an endpoint.
//!
//! # Design
//! An argument is one of three shapes: a plain record, a "postable" record
//! whose body travels under `data`, or a "form" record whose body travels
//! under `form` and is sent as multipart. The shape is a closed enum, so the
//! default request transformer and the channel selector are total matches
//! instead of field probes.
//!
//! Templates render against the full record as the caller wrote it, which is
//! why `to_value` puts the wrapped body back under its field name.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ArgumentError;

const DATA_FIELD: &str = "data";
const FORM_FIELD: &str = "form";

/// The argument of one endpoint invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A record sent as-is.
    Plain(Value),
    /// Path parameters plus a body carried under `data`.
    Postable { params: Value, data: Value },
    /// Path parameters plus a body carried under `form`, sent as multipart.
    Form { params: Value, form: Value },
}

impl Argument {
    /// An empty plain record.
    pub fn empty() -> Self {
        Self::Plain(Value::Object(Map::new()))
    }

    pub fn plain<T: Serialize + ?Sized>(value: &T) -> Result<Self, ArgumentError> {
        Ok(Self::Plain(serde_json::to_value(value)?))
    }

    pub fn postable<P, D>(params: &P, data: &D) -> Result<Self, ArgumentError>
    where
        P: Serialize + ?Sized,
        D: Serialize + ?Sized,
    {
        Ok(Self::Postable {
            params: serde_json::to_value(params)?,
            data: serde_json::to_value(data)?,
        })
    }

    /// Wrap `form` as a multipart body. `params` supplies path parameters.
    pub fn form<P, F>(params: &P, form: &F) -> Result<Self, ArgumentError>
    where
        P: Serialize + ?Sized,
        F: Serialize + ?Sized,
    {
        Ok(Self::Form {
            params: serde_json::to_value(params)?,
            form: serde_json::to_value(form)?,
        })
    }

    /// Classify an untyped record. A `form` field wins over a `data` field.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                if let Some(form) = map.remove(FORM_FIELD) {
                    Self::Form {
                        params: Value::Object(map),
                        form,
                    }
                } else if let Some(data) = map.remove(DATA_FIELD) {
                    Self::Postable {
                        params: Value::Object(map),
                        data,
                    }
                } else {
                    Self::Plain(Value::Object(map))
                }
            }
            other => Self::Plain(other),
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Self::Form { .. })
    }

    /// The full record, with a wrapped body restored under `data` or `form`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Postable { params, data } => with_field(params, DATA_FIELD, data),
            Self::Form { params, form } => with_field(params, FORM_FIELD, form),
        }
    }
}

impl Default for Argument {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

fn with_field(params: &Value, field: &str, body: &Value) -> Value {
    let mut map = match params {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    map.insert(field.to_string(), body.clone());
    Value::Object(map)
}
