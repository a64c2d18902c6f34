//! Explicit metadata side-channel.
//!
//! The original framework leans on a process-wide reflection facility to
//! stash per-method/per-class state (advice bindings, ids, annotation
//! markers). Per Design Note §9, this kernel replaces that with an
//! explicit `class → {key → value}` table owned by the `Weaver`. Every
//! "metadata key X" read/write in spec.md maps to this store.

use crate::value::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Per-class and per-method metadata, keyed the way spec.md §6 names its
/// side-channel keys (`aspect`, `order`, `pointcut`, `argNames`, `id`,
/// `namespace`, plus user-defined annotation keys).
#[derive(Default)]
pub struct MetadataStore {
    class_meta: RwLock<HashMap<String, HashMap<String, Value>>>,
    method_meta: RwLock<HashMap<(String, String), HashMap<String, Value>>>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach metadata to a class (the target's type, not an instance).
    pub fn set_class(&self, class: impl Into<String>, key: impl Into<String>, value: Value) {
        self.class_meta
            .write()
            .unwrap()
            .entry(class.into())
            .or_default()
            .insert(key.into(), value);
    }

    /// Read class-level metadata.
    pub fn get_class(&self, class: &str, key: &str) -> Option<Value> {
        self.class_meta.read().unwrap().get(class).and_then(|m| m.get(key).cloned())
    }

    /// Whether the class carries the given metadata key, regardless of value.
    pub fn has_class(&self, class: &str, key: &str) -> bool {
        self.class_meta
            .read()
            .unwrap()
            .get(class)
            .is_some_and(|m| m.contains_key(key))
    }

    /// Attach metadata to `class.prototype[method]`, e.g. `argNames`.
    pub fn set_method(
        &self,
        class: impl Into<String>,
        method: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) {
        self.method_meta
            .write()
            .unwrap()
            .entry((class.into(), method.into()))
            .or_default()
            .insert(key.into(), value);
    }

    /// Read method-level metadata.
    pub fn get_method(&self, class: &str, method: &str, key: &str) -> Option<Value> {
        self.method_meta
            .read()
            .unwrap()
            .get(&(class.to_string(), method.to_string()))
            .and_then(|m| m.get(key).cloned())
    }

    /// Whether `class.prototype[method]` carries the given metadata key.
    pub fn has_method(&self, class: &str, method: &str, key: &str) -> bool {
        self.method_meta
            .read()
            .unwrap()
            .get(&(class.to_string(), method.to_string()))
            .is_some_and(|m| m.contains_key(key))
    }

    /// Clear every entry. Called by `Weaver::dispose`.
    pub fn clear(&self) {
        self.class_meta.write().unwrap().clear();
        self.method_meta.write().unwrap().clear();
    }
}
