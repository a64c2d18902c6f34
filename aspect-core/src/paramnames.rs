//! Parameter-name discovery (C2).
//!
//! Two strategies, queried in the fixed order spec.md §4.2 gives: an
//! annotation-backed override, then a reflective fallback driven by the
//! method's registered declaration.

use crate::error::AspectError;
use crate::metadata::MetadataStore;
use crate::pointcut::MethodInfo;
use std::sync::Arc;

/// `discover(target, methodName) -> ordered names | unknown`.
pub trait ParameterNameDiscoverer: Send + Sync {
    /// Attempt to resolve the formal parameter names of `method` on
    /// `owner_type`. Returns `None` ("unknown") rather than erroring —
    /// callers chain multiple discoverers and only fail once all of them
    /// answer unknown.
    fn discover(&self, owner_type: &str, method: &str) -> Option<Vec<String>>;
}

/// Reads the `argNames` metadata key attached to `owner_type.prototype`
/// under `method`; splits on commas and trims.
pub struct AnnotationDiscoverer<'a> {
    metadata: &'a MetadataStore,
}

impl<'a> AnnotationDiscoverer<'a> {
    /// Build a discoverer backed by `metadata`.
    pub fn new(metadata: &'a MetadataStore) -> Self {
        Self { metadata }
    }
}

impl ParameterNameDiscoverer for AnnotationDiscoverer<'_> {
    fn discover(&self, owner_type: &str, method: &str) -> Option<Vec<String>> {
        let value = self.metadata.get_method(owner_type, method, "argNames")?;
        let text = value.as_str()?;
        Some(text.split(',').map(|s| s.trim().to_string()).collect())
    }
}

/// Reads the declared parameter names recorded on a `MethodInfo` — the
/// Rust stand-in for "ask the host reflection layer" (Design Note §9).
pub struct ReflectiveDiscoverer<'a> {
    method: &'a MethodInfo,
}

impl<'a> ReflectiveDiscoverer<'a> {
    /// Build a discoverer backed by `method`'s declared parameter names.
    pub fn new(method: &'a MethodInfo) -> Self {
        Self { method }
    }
}

impl ParameterNameDiscoverer for ReflectiveDiscoverer<'_> {
    fn discover(&self, _owner_type: &str, method: &str) -> Option<Vec<String>> {
        if method != self.method.name {
            return None;
        }
        if self.method.param_types.is_empty() {
            return None;
        }
        Some(self.method.param_types.clone())
    }
}

/// Chain discoverers in the fixed order spec.md §4.2 mandates, failing
/// with [`AspectError::Discovery`] if none of them succeeds.
pub fn get_parameter_names(
    discoverers: &[Arc<dyn ParameterNameDiscoverer + '_>],
    owner_type: &str,
    method: &str,
) -> Result<Vec<String>, AspectError> {
    for discoverer in discoverers {
        if let Some(names) = discoverer.discover(owner_type, method) {
            return Ok(names);
        }
    }
    Err(AspectError::discovery(format!(
        "unresolvable parameter names for {owner_type}::{method}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn annotation_strategy_wins_when_present() {
        let metadata = MetadataStore::new();
        metadata.set_method("svc", "greet", "argNames", Value::str("jp, result"));
        let annotation = AnnotationDiscoverer::new(&metadata);
        let method = MethodInfo::new("greet", vec!["i64".into(), "i64".into()]);
        let reflective = ReflectiveDiscoverer::new(&method);

        let discoverers: Vec<Arc<dyn ParameterNameDiscoverer + '_>> =
            vec![Arc::new(annotation), Arc::new(reflective)];
        let names = get_parameter_names(&discoverers, "svc", "greet").unwrap();
        assert_eq!(names, vec!["jp".to_string(), "result".to_string()]);
    }

    #[test]
    fn falls_back_to_reflective_strategy() {
        let metadata = MetadataStore::new();
        let method = MethodInfo::new("add", vec!["a".into(), "b".into()]);
        let discoverers: Vec<Arc<dyn ParameterNameDiscoverer + '_>> = vec![
            Arc::new(AnnotationDiscoverer::new(&metadata)),
            Arc::new(ReflectiveDiscoverer::new(&method)),
        ];
        let names = get_parameter_names(&discoverers, "svc", "add").unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn unresolvable_is_a_discovery_error() {
        let metadata = MetadataStore::new();
        let method = MethodInfo::new("add", vec![]);
        let discoverers: Vec<Arc<dyn ParameterNameDiscoverer + '_>> = vec![
            Arc::new(AnnotationDiscoverer::new(&metadata)),
            Arc::new(ReflectiveDiscoverer::new(&method)),
        ];
        let err = get_parameter_names(&discoverers, "svc", "add").unwrap_err();
        assert!(matches!(err, AspectError::Discovery(_)));
    }
}
