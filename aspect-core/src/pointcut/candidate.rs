//! The candidates a pointcut primitive is evaluated against.

use crate::joinpoint::JoinPoint;
use crate::metadata::MetadataStore;

/// Declared information about the method a join point targets.
///
/// Stands in for the "host reflection layer" spec.md §4.2/§4.4 assumes:
/// callers register this once, at weave time, instead of the kernel
/// discovering it by inspecting a live function value.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// The method's name.
    pub name: String,
    /// Whether the method is declared `pub`.
    pub public: bool,
    /// Declared parameter type names, in order, used by `args(ti)` /
    /// `SelectorMatcher::match_arguments` and the reflective parameter
    /// name discoverer.
    pub param_types: Vec<String>,
}

impl MethodInfo {
    /// Convenience constructor for a public method with the given
    /// parameter types.
    pub fn new(name: impl Into<String>, param_types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            public: true,
            param_types,
        }
    }

    /// Mark this method non-public.
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}

/// Everything a pointcut primitive needs to decide whether it matches.
pub struct MatchContext<'a> {
    /// The join point under evaluation.
    pub join_point: &'a JoinPoint,
    /// Declared information about the targeted method, when the join
    /// point carries a method-level event. `None` for class-only filters.
    pub method: Option<&'a MethodInfo>,
    /// The proxy's own type name, used by `this(name)`.
    pub proxy_type: &'a str,
    /// The metadata side-channel, used by `@target`/`@within`/
    /// `@annotation`/`@args`.
    pub metadata: &'a MetadataStore,
}

impl<'a> MatchContext<'a> {
    /// Construct a context for a method-level join point.
    pub fn for_method(
        join_point: &'a JoinPoint,
        method: &'a MethodInfo,
        proxy_type: &'a str,
        metadata: &'a MetadataStore,
    ) -> Self {
        Self {
            join_point,
            method: Some(method),
            proxy_type,
            metadata,
        }
    }
}
