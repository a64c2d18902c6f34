//! # aspect-runtime
//!
//! Stateful runtime support for the aspect-oriented interception kernel:
//! the class/advice registries, the five advice decorators, the
//! [`ProxyFactory`], and the [`Weaver`] boot/dispose lifecycle.
//!
//! `aspect-core` supplies the data model and the side-effect-free
//! pointcut interpreter; this crate supplies everything that needs
//! process-wide (or at least weaver-wide) mutable state.
//!
//! # Example
//!
//! ```rust
//! use aspect_runtime::class_registry::{ClassRegistry, MethodDescriptor};
//! use aspect_runtime::config::{AdviceConfig, AdviceKindConfig, AopConfig, AspectConfig};
//! use aspect_runtime::aspect_module::AspectModule;
//! use aspect_runtime::weaver::Weaver;
//! use aspect_core::pointcut::MethodInfo;
//! use aspect_core::value::Value;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let class_registry = Arc::new(ClassRegistry::new());
//! class_registry.define_method(
//!     "svc::Service",
//!     "greet",
//!     MethodDescriptor { info: MethodInfo::new("greet", vec![]), func: Arc::new(|_jp, _args| Ok(Value::Int(0))) },
//! );
//!
//! let weaver = Weaver::new(Arc::clone(&class_registry));
//! let module = AspectModule::new("svc::Service")
//!     .with_method("logBefore", Arc::new(|_args| Ok(Value::Unit)));
//! let mut modules = HashMap::new();
//! modules.insert("logging".to_string(), module);
//!
//! let config = AopConfig {
//!     pointcuts: None,
//!     aspects: vec![AspectConfig {
//!         id: "logging-aspect".into(),
//!         module_ref: "logging".into(),
//!         order: None,
//!         pointcuts: None,
//!         advices: vec![AdviceConfig {
//!             kind: AdviceKindConfig::Before,
//!             method: "logBefore".into(),
//!             target_method: None,
//!             pointcut: Some("execution(* svc::Service.greet(..))".into()),
//!             pointcut_ref: None,
//!             returning: None,
//!             throwing: None,
//!             arg_names: None,
//!         }],
//!     }],
//!     advisors: None,
//!     proxy_target_class: false,
//!     use_aspect_j: false,
//!     frozen: false,
//!     expose_proxy: false,
//! };
//!
//! weaver.boot(&config, &modules).unwrap();
//! ```

pub mod advice_registry;
pub mod aspect_module;
pub mod class_registry;
pub mod config;
pub mod decorators;
pub mod proxy;
pub mod weaver;

pub use advice_registry::{AdviceArgs, AdviceBody, AdviceKind, AdviceRecord, AdviceRegistry};
pub use aspect_module::AspectModule;
pub use class_registry::{ClassRegistry, MethodDescriptor, MethodFn};
pub use config::AopConfig;
pub use proxy::{current_proxy, ProxyFactory};
pub use weaver::Weaver;

// Re-export once_cell for use by downstream crates wiring up their own
// process-wide registries, the way `aspect-std` does for its example advices.
pub use once_cell;
