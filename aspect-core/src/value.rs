//! Dynamic values flowing through the interception runtime.
//!
//! The kernel has no runtime reflection, so every actual argument, return
//! value, thrown error payload, or metadata value that crosses the
//! advice/pointcut boundary is represented uniformly as a [`Value`]. This is
//! the Rust stand-in for the dynamically-typed "actual" the spec's pointcut
//! primitives reason about (`args(t1,…,tn)`, `@args`, metadata lookups, …).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Capability every target/application object must implement so the kernel
/// can answer "what is your runtime type name" without reflection.
///
/// This replaces the host reflection layer the spec assumes (Design Note
/// in spec.md §9): implementers provide `type_name` explicitly instead of
/// the kernel discovering it.
pub trait Typed: Any + Send + Sync {
    /// The candidate's runtime type name, as used by `within`, `target`,
    /// `this`, and `args` pointcut primitives.
    fn type_name(&self) -> &'static str;

    /// Upcast to `&dyn Any` for downcasting by application code.
    fn as_any(&self) -> &dyn Any;
}

/// A dynamically-typed value.
///
/// Closed over the handful of shapes the kernel itself needs to reason
/// about (primitives, lists for `args` tuples) plus an escape hatch,
/// `Object`, for opaque application values that only need to flow through
/// unexamined.
#[derive(Clone)]
pub enum Value {
    /// The absence of a value (e.g. a function returning `()`).
    Unit,
    /// A boolean actual.
    Bool(bool),
    /// A signed integer actual.
    Int(i64),
    /// A floating point actual.
    Float(f64),
    /// A string actual.
    Str(String),
    /// An ordered tuple of actuals, used to represent `args(..)` candidates.
    List(Vec<Value>),
    /// An opaque application object, carrying its own type name.
    Object(Arc<dyn Typed>),
}

impl Value {
    /// The runtime type name of this value, as compared against `args(ti)`
    /// and `@args` patterns.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Unit => "()",
            Value::Bool(_) => "bool",
            Value::Int(_) => "i64",
            Value::Float(_) => "f64",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// Construct a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Construct an opaque object value.
    pub fn object(obj: Arc<dyn Typed>) -> Self {
        Value::Object(obj)
    }

    /// Borrow the string payload, if this value is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, ""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", rendered.join(","))
            }
            Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
