//! JoinPoint: the immutable snapshot of a single interception event.

use crate::value::{Typed, Value};
use std::fmt;
use std::sync::Arc;

/// A single interception event: a method call against a target object.
///
/// Created per call, never mutated, discarded when the call unwinds.
/// Matches spec.md §3's `JoinPoint` exactly: `target`, `methodName`
/// (optional, for class-only aspects), and `args`.
#[derive(Clone)]
pub struct JoinPoint {
    target: Arc<dyn Typed>,
    method_name: Option<String>,
    args: Vec<Value>,
}

impl JoinPoint {
    /// Construct a new join point.
    pub fn new(
        target: Arc<dyn Typed>,
        method_name: Option<impl Into<String>>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            target,
            method_name: method_name.map(Into::into),
            args,
        }
    }

    /// The receiving object.
    pub fn target(&self) -> &Arc<dyn Typed> {
        &self.target
    }

    /// The ordered sequence of actual arguments.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The constructor/class of `target`.
    pub fn owner_type(&self) -> &'static str {
        self.target.type_name()
    }

    /// `methodName`, present unless this join point describes a
    /// class-only aspect.
    pub fn signature(&self) -> Option<&str> {
        self.method_name.as_deref()
    }
}

impl fmt::Display for JoinPoint {
    /// `"<methodName>.<signature>(<args joined by ,>)"` when a signature is
    /// present, else `"<owner-type name> class"` — the literal format
    /// spec.md §4.1 gives (it names `methodName` and `signature` as the
    /// same field; the duplication is reproduced here rather than "fixed",
    /// consistent with how this kernel otherwise treats the source
    /// behavior as load-bearing unless a REDESIGN FLAG says otherwise).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method_name {
            Some(name) => {
                let rendered_args: Vec<String> = self.args.iter().map(|v| v.to_string()).collect();
                write!(f, "{name}.{name}({})", rendered_args.join(","))
            }
            None => write!(f, "{} class", self.owner_type()),
        }
    }
}
