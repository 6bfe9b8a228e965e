use super::error::EvalError;
use crate::env::{Group, NodeRef};
use serde_json::{Map, Value as Json};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Runtime value. Strings and mappings borrow from the environment where possible.
#[derive(Clone, Debug)]
pub enum Value<'env> {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'env, str>),
    List(Vec<Value<'env>>),
    Map(&'env Map<String, Json>),
    Group(&'env Group),
}

/// Numeric view used by arithmetic and ordering; booleans count as integers.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

impl<'env> Value<'env> {
    pub fn from_json(json: &'env Json) -> Self {
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(Cow::Borrowed(s.as_str())),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::Map(map),
        }
    }

    pub fn from_node(node: NodeRef<'env>) -> Self {
        match node {
            NodeRef::Value(json) => Value::from_json(json),
            NodeRef::Group(group) => Value::Group(group),
        }
    }

    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "dict",
            Value::Group(_) => "namespace",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Group(_) => true,
        }
    }

    pub(crate) fn as_num(&self) -> Option<Num> {
        match self {
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    /// Equality with numeric coercion across bool/int/float.
    pub fn py_eq(&self, other: &Value<'_>) -> bool {
        if let (Some(a), Some(b)) = (self.as_num(), other.as_num()) {
            return match (a, b) {
                (Num::Int(a), Num::Int(b)) => a == b,
                (a, b) => a.as_f64() == b.as_f64(),
            };
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.py_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering for `< <= > >=`; mismatched types are a type error.
    pub fn py_cmp(&self, other: &Value<'_>, symbol: &str) -> Result<Ordering, EvalError> {
        if let (Some(a), Some(b)) = (self.as_num(), other.as_num()) {
            let ord = match (a, b) {
                (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
                (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
            };
            return ord.ok_or_else(|| EvalError::Type("comparison with NaN".to_string()));
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok((**a).cmp(&**b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    if !x.py_eq(y) {
                        return x.py_cmp(y, symbol);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            _ => Err(EvalError::Type(format!(
                "'{symbol}' not supported between instances of '{}' and '{}'",
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}
