//! Structured logging advice bodies, ready to hand to an
//! [`aspect_runtime::aspect_module::AspectModule`].

use aspect_core::value::Value;
use aspect_runtime::advice_registry::AdviceBody;
use std::sync::Arc;

/// Build a `before` advice body that logs the join point at `level`.
///
/// # Example
///
/// ```rust
/// use aspect_std::logging::before_advice;
/// use aspect_runtime::aspect_module::AspectModule;
///
/// let module = AspectModule::new("svc::Service")
///     .with_method("logBefore", before_advice(log::Level::Info));
/// ```
pub fn before_advice(level: log::Level) -> AdviceBody {
    Arc::new(move |args| {
        log::log!(level, "[ENTRY] {}", args.join_point);
        Ok(Value::Unit)
    })
}

/// Build an `after` advice body that logs the join point at `level`.
pub fn after_advice(level: log::Level) -> AdviceBody {
    Arc::new(move |args| {
        log::log!(level, "[EXIT] {}", args.join_point);
        Ok(Value::Unit)
    })
}

/// Build an `afterReturning` advice body that logs the join point and its
/// result at `level`.
pub fn after_returning_advice(level: log::Level) -> AdviceBody {
    Arc::new(move |args| {
        let result = args.result.cloned().unwrap_or(Value::Unit);
        log::log!(level, "[EXIT] {} -> {}", args.join_point, result);
        Ok(Value::Unit)
    })
}

/// Build an `afterThrowing` advice body that always logs at
/// [`log::Level::Error`] regardless of the configured level, since a
/// propagating error is itself the thing worth surfacing.
pub fn after_throwing_advice() -> AdviceBody {
    Arc::new(|args| {
        if let Some(error) = args.error {
            log::error!("[ERROR] {} failed: {error}", args.join_point);
        }
        Ok(Value::Unit)
    })
}
