//! Pointcut expressions: the small interpreter at the heart of the kernel.
//!
//! # Example
//!
//! ```rust
//! use aspect_core::pointcut::{PointcutExpression, PointcutRegistry};
//!
//! let registry = PointcutRegistry::new();
//! let pc = PointcutExpression::parse("execution(* svc.greet(..))", &registry).unwrap();
//! let pc = PointcutExpression::parse("within(svc) && execution(* svc.greet(..))", &registry).unwrap();
//! ```

pub mod candidate;
pub mod expr;
pub mod primitive;
pub mod registry;

pub use candidate::{MatchContext, MethodInfo};
pub use expr::PointcutExpression;
pub use primitive::Primitive;
pub use registry::PointcutRegistry;
