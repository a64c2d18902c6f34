//! Advice registry (C6): per-class, per-kind ordered advice bindings.

use aspect_core::error::AspectError;
use aspect_core::joinpoint::JoinPoint;
use aspect_core::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The five advice kinds spec.md §4.8 names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// Runs before the wrapped call.
    Before,
    /// Runs after the wrapped call on every path.
    After,
    /// Runs only after a normal return, bound to `result`.
    AfterReturning,
    /// Runs only after an abrupt termination, bound to `error`.
    AfterThrowing,
    /// Runs in place of the wrapped call, given a proceed thunk.
    Around,
}

/// The resolved argument bindings an advice body receives, built per
/// spec.md §4.8 step 3: `joinPoint`, `result`, `error`, and any other
/// declared name bound positionally from the actual call arguments.
pub struct AdviceArgs<'a> {
    /// The join point for this call.
    pub join_point: &'a JoinPoint,
    /// The return value, for `afterReturning`/`around`.
    pub result: Option<&'a Value>,
    /// The propagating error, for `afterThrowing`.
    pub error: Option<&'a AspectError>,
    /// A synchronous proceed thunk, for `around`.
    pub proceed: Option<Arc<dyn Fn() -> Result<Value, AspectError> + Send + Sync + 'a>>,
    /// The declared parameter names (from C2), in order.
    pub arg_names: &'a [String],
    /// The original call's actual arguments, for positional binding.
    pub actuals: &'a [Value],
}

impl<'a> AdviceArgs<'a> {
    /// Resolve one declared name to its bound value, following the
    /// special-name/positional rule spec.md §4.8 step 3 gives.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        match name {
            "joinPoint" => Some(Value::str(self.join_point.to_string())),
            "result" => self.result.cloned(),
            "error" => self.error.map(|e| Value::str(e.to_string())),
            other => {
                let position = self.arg_names.iter().position(|n| n == other)?;
                self.actuals.get(position).cloned()
            }
        }
    }

    /// Build the full ordered argument vector for `arg_names`.
    pub fn bind_all(&self) -> Vec<Value> {
        self.arg_names
            .iter()
            .map(|name| self.resolve(name).unwrap_or(Value::Unit))
            .collect()
    }
}

/// An advice body: receives the resolved argument bindings.
pub type AdviceBody = Arc<dyn Fn(&AdviceArgs) -> Result<Value, AspectError> + Send + Sync>;

/// One installed advice binding.
#[derive(Clone)]
pub struct AdviceRecord {
    /// The textual pointcut this binding was installed against. Matched
    /// by exact string equality at call time (spec.md §9 Open Question
    /// #1 — carried forward as-is rather than re-evaluated).
    pub pointcut_text: String,
    /// Declared parameter names for this advice, from C2.
    pub arg_names: Vec<String>,
    /// The advice body.
    pub body: AdviceBody,
}

/// `class -> kind -> ordered advice records`.
#[derive(Default)]
pub struct AdviceRegistry {
    entries: RwLock<HashMap<String, HashMap<AdviceKind, Vec<AdviceRecord>>>>,
}

impl AdviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record — the only mutation this table supports at
    /// installation time (spec.md §4.6).
    pub fn install(&self, class: impl Into<String>, kind: AdviceKind, record: AdviceRecord) {
        self.entries
            .write()
            .unwrap()
            .entry(class.into())
            .or_default()
            .entry(kind)
            .or_default()
            .push(record);
    }

    /// Read-only lookup of every record of `kind` on `class` whose
    /// pointcut text equals `pointcut_text`, in installation order.
    pub fn matching(&self, class: &str, kind: AdviceKind, pointcut_text: &str) -> Vec<AdviceRecord> {
        self.entries
            .read()
            .unwrap()
            .get(class)
            .and_then(|kinds| kinds.get(&kind))
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.pointcut_text == pointcut_text)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove every entry. Called by `Weaver::dispose`.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
