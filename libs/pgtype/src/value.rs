//! Dynamic source values accepted by `set` and returned by `get`.

use std::fmt;
use std::sync::Arc;

use crate::macros::impl_value_from;

/// A framework type that can be carried inside [`Value::Dyn`].
///
/// The default methods describe a type with no conversion capabilities;
/// implementors opt into them by overriding.
pub trait DynValue: fmt::Debug + Send + Sync + 'static {
    /// Runtime type name, used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Unwraps the value this type stands for, if it exposes one.
    fn get(&self) -> Option<Value> {
        None
    }

    /// Returns the value in a built-in representation it shares, if any.
    ///
    /// A newtype over 16 bytes returns `Some(Value::Uuid(..))` here.
    fn underlying(&self) -> Option<Value> {
        None
    }
}

/// A loosely typed value.
///
/// `Null` is the sentinel returned by `get` for an absent value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Uuid([u8; 16]),
    Bytes(Vec<u8>),
    Text(String),
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Dyn(Arc<dyn DynValue>),
}

impl Value {
    /// Wraps a framework type.
    pub fn dynamic<T: DynValue>(value: T) -> Self {
        Value::Dyn(Arc::new(value))
    }

    /// Returns true for the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type name of the carried value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Uuid(_) => "[u8; 16]",
            Value::Bytes(_) => "Vec<u8>",
            Value::Text(_) => "String",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "i64",
            Value::Float64(_) => "f64",
            Value::Dyn(v) => v.type_name(),
        }
    }

    /// Returns true if `other` is the very same framework value as `self`.
    ///
    /// Only `Dyn` values have an identity; plain data never does.
    pub(crate) fn is_identical(&self, other: &Arc<dyn DynValue>) -> bool {
        match self {
            Value::Dyn(v) => Arc::ptr_eq(v, other),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Dyn(a), Value::Dyn(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl_value_from!(Value {
    () => |_v| Value::Null,
    [u8; 16] => |v| Value::Uuid(v),
    Option<[u8; 16]> => |v| v.map_or(Value::Null, Value::Uuid),
    Vec<u8> => |v| Value::Bytes(v),
    &[u8] => |v| Value::Bytes(v.to_vec()),
    Option<Vec<u8>> => |v| v.map_or(Value::Null, Value::Bytes),
    Option<&[u8]> => |v| v.map_or(Value::Null, |b| Value::Bytes(b.to_vec())),
    String => |v| Value::Text(v),
    &str => |v| Value::Text(v.to_owned()),
    Option<String> => |v| v.map_or(Value::Null, Value::Text),
    Option<&str> => |v| v.map_or(Value::Null, |s| Value::Text(s.to_owned())),
    bool => |v| Value::Bool(v),
    i64 => |v| Value::Int64(v),
    f64 => |v| Value::Float64(v),
    Arc<dyn DynValue> => |v| Value::Dyn(v),
});
