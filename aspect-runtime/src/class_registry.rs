//! The "target class prototype" the weaver installs advice onto.
//!
//! The source framework looks up and redefines methods on a live
//! prototype object. Without that facility this kernel registers each
//! class's methods explicitly, keyed by name, and a decorator installs
//! advice by replacing the registered [`MethodFn`] with a wrapping one —
//! the same "redefine the own prototype function" step spec.md §4.9
//! describes, just against an explicit table instead of a live object.

use aspect_core::joinpoint::JoinPoint;
use aspect_core::pointcut::MethodInfo;
use aspect_core::value::Value;
use aspect_core::AspectError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A callable target method: `(joinPoint, actuals) -> result`.
pub type MethodFn = Arc<dyn Fn(&JoinPoint, &[Value]) -> Result<Value, AspectError> + Send + Sync>;

/// A method's declared shape plus its current callable, which decorators
/// overwrite in place as advice installs.
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Declared parameter/visibility metadata.
    pub info: MethodInfo,
    /// The current callable — the original body the first time it is
    /// registered, progressively wrapped as advice decorators apply.
    pub func: MethodFn,
}

/// `class name -> method name -> descriptor`, process-wide, mutated only
/// during boot and dispose per spec.md §5.
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, HashMap<String, MethodDescriptor>>>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method's original body on `class`.
    pub fn define_method(&self, class: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) {
        self.classes
            .write()
            .unwrap()
            .entry(class.into())
            .or_default()
            .insert(name.into(), descriptor);
    }

    /// Look up a method's current callable and declared info.
    pub fn get_method(&self, class: &str, name: &str) -> Option<MethodDescriptor> {
        self.classes.read().unwrap().get(class)?.get(name).cloned()
    }

    /// Replace a method's callable in place — the decorator installation
    /// side effect of spec.md §4.8's "appends `{pointcutText,
    /// methodFromTargetPrototype}`".
    pub fn redefine_method(&self, class: &str, name: &str, func: MethodFn) -> Result<(), AspectError> {
        let mut classes = self.classes.write().unwrap();
        let methods = classes
            .get_mut(class)
            .ok_or_else(|| AspectError::reference(format!("unknown target class `{class}`")))?;
        let descriptor = methods
            .get_mut(name)
            .ok_or_else(|| AspectError::reference(format!("missing method `{class}::{name}` on prototype")))?;
        descriptor.func = func;
        Ok(())
    }

    /// All method names declared on `class`, used by the AspectJ-style
    /// proxy mode's per-access dispatch.
    pub fn method_names(&self, class: &str) -> Vec<String> {
        self.classes
            .read()
            .unwrap()
            .get(class)
            .map(|methods| methods.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove every entry. Called by `Weaver::dispose`.
    pub fn clear(&self) {
        self.classes.write().unwrap().clear();
    }
}
