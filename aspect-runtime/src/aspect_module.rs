//! Aspect module resolution.
//!
//! spec.md §4.10 has the weaver "load" an aspect by a module-locator
//! string, then pull the advice method named in its config off that
//! module's default export. A target without a dynamic module loader
//! replaces this with a caller-supplied lookup table handed to
//! `Weaver::boot` — see DESIGN.md for this Open-Question-adjacent
//! reading.

use crate::advice_registry::AdviceBody;
use std::collections::HashMap;

/// One aspect's compiled definition: the target class it overlays, plus
/// its advice method bodies keyed by the name used in `AdviceConfig.method`.
pub struct AspectModule {
    /// The class this module's advices are woven onto.
    pub target_class: String,
    /// Advice bodies, keyed by method name.
    pub methods: HashMap<String, AdviceBody>,
}

impl AspectModule {
    /// Build a module over `target_class` with no methods registered yet.
    pub fn new(target_class: impl Into<String>) -> Self {
        Self {
            target_class: target_class.into(),
            methods: HashMap::new(),
        }
    }

    /// Register an advice method.
    pub fn with_method(mut self, name: impl Into<String>, body: AdviceBody) -> Self {
        self.methods.insert(name.into(), body);
        self
    }
}
