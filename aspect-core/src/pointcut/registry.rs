//! Process-wide registry of named pointcuts (spec.md §3, "Pointcut
//! registry"). Owned by whoever drives weaving — see `aspect-runtime`'s
//! `Weaver`, which injects a fresh instance per weaver rather than relying
//! on a global singleton (Design Note §9: "make this object injectable so
//! tests can instantiate independent weavers").

use super::expr::PointcutExpression;
use std::collections::HashMap;
use std::sync::RwLock;

/// `name -> PointcutExpression`. Bare identifiers inside another
/// expression resolve against this registry.
#[derive(Default)]
pub struct PointcutRegistry {
    entries: RwLock<HashMap<String, PointcutExpression>>,
}

impl PointcutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named pointcut.
    pub fn set(&self, name: impl Into<String>, expr: PointcutExpression) {
        self.entries.write().unwrap().insert(name.into(), expr);
    }

    /// Look up a named pointcut.
    pub fn get(&self, name: &str) -> Option<PointcutExpression> {
        self.entries.read().unwrap().get(name).cloned()
    }

    /// Whether a name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.entries.read().unwrap().contains_key(name)
    }

    /// Remove a named pointcut.
    pub fn delete(&self, name: &str) -> bool {
        self.entries.write().unwrap().remove(name).is_some()
    }

    /// Remove every entry. Called by `Weaver::dispose`.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
