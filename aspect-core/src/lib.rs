//! # aspect-core
//!
//! Data model and pointcut/matcher interpreter for an aspect-oriented
//! interception kernel.
//!
//! This crate owns the pieces that never need process-wide state: the
//! [`Value`]/[`Typed`] substitute for runtime reflection, [`JoinPoint`],
//! parameter-name discovery, the pointcut expression language and its
//! primitives, CSS-selector and ordered-regex matching, the explicit
//! [`MetadataStore`] side-channel, and the [`Advisor`] pairing. Stateful
//! concerns — the advice registry, proxy factory, and weaver boot/dispose
//! lifecycle — live in `aspect-runtime`, built on top of these types.
//!
//! ## Core Concepts
//!
//! - **JoinPoint**: a single interception event — a target, an optional
//!   method name, and the actual arguments.
//! - **PointcutExpression**: a left-to-right boolean combination of
//!   primitive predicates (`execution`, `within`, `args`, …) or named
//!   references.
//! - **Advisor**: one advice function bound to one matcher.
//!
//! ## Example
//!
//! ```rust
//! use aspect_core::pointcut::{PointcutExpression, PointcutRegistry};
//! use aspect_core::joinpoint::JoinPoint;
//! use aspect_core::pointcut::{MatchContext, MethodInfo};
//! use aspect_core::metadata::MetadataStore;
//! use aspect_core::value::Typed;
//! use std::sync::Arc;
//!
//! struct Greeter;
//! impl Typed for Greeter {
//!     fn type_name(&self) -> &'static str { "svc::Greeter" }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//! }
//!
//! let registry = PointcutRegistry::new();
//! let pc = PointcutExpression::parse("execution(* svc::Greeter.greet(..))", &registry).unwrap();
//!
//! let jp = JoinPoint::new(Arc::new(Greeter), Some("greet"), vec![]);
//! let method = MethodInfo::new("greet", vec![]);
//! let metadata = MetadataStore::new();
//! let ctx = MatchContext::for_method(&jp, &method, "svc::Greeter", &metadata);
//! assert!(pc.evaluate(&ctx));
//! ```
//!
//! ## Thread Safety
//!
//! Every type here is `Send + Sync`; the concurrency model is
//! single-threaded cooperative (see `aspect-runtime`'s weaver), not
//! lock-free for parallel use.

#![deny(missing_docs)]

pub mod advisor;
pub mod error;
pub mod joinpoint;
pub mod metadata;
pub mod paramnames;
pub mod pointcut;
pub mod regexp_matcher;
pub mod selector;
pub mod value;

// Re-export core types
pub use advisor::{AdviceFn, Advisor, Matcher};
pub use error::AspectError;
pub use joinpoint::JoinPoint;
pub use metadata::MetadataStore;
pub use regexp_matcher::RegexpMatcher;
pub use selector::SelectorMatcher;
pub use value::{Typed, Value};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::advisor::{AdviceFn, Advisor, Matcher};
    pub use crate::error::AspectError;
    pub use crate::joinpoint::JoinPoint;
    pub use crate::metadata::MetadataStore;
    pub use crate::paramnames::{get_parameter_names, ParameterNameDiscoverer};
    pub use crate::pointcut::{MatchContext, MethodInfo, PointcutExpression, PointcutRegistry, Primitive};
    pub use crate::regexp_matcher::RegexpMatcher;
    pub use crate::selector::SelectorMatcher;
    pub use crate::value::{Typed, Value};
}
