//! # aspect-std
//!
//! Example advice bodies built on the `aspect-core`/`aspect-runtime`
//! interception kernel, ready to register against an
//! [`aspect_runtime::aspect_module::AspectModule`]:
//! - **Logging**: structured before/after/afterReturning/afterThrowing
//!   logging at a chosen level
//! - **Timing**: call-duration statistics via an `around` advice
//!
//! ## Quick Start
//!
//! ```rust
//! use aspect_std::logging::before_advice;
//! use aspect_runtime::aspect_module::AspectModule;
//!
//! let module = AspectModule::new("svc::Service")
//!     .with_method("logBefore", before_advice(log::Level::Info));
//! ```

pub mod logging;
pub mod timing;

pub use timing::TimingAdvice;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::logging::{after_advice, after_returning_advice, after_throwing_advice, before_advice};
    pub use crate::timing::TimingAdvice;
}
