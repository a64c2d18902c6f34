//! ProxyFactory (C9).
//!
//! The source framework produces one of three kinds of live JS proxy
//! (transparent `Proxy`, prototype overlay "class proxy", AspectJ-style
//! per-access dispatch). Per Design Note §9 ("a clean reimplementation
//! can collapse them into one transparent-proxy strategy plus one
//! prototype-overlay strategy"), this kernel keeps exactly that collapse:
//! the prototype-overlay strategy is the default (advice is already woven
//! directly into [`ClassRegistry`] method slots by the decorators), and
//! `expose_proxy` is realized as a thread-local "current proxy" slot
//! scoped to the synchronous call extent, per spec.md §5.

use crate::class_registry::ClassRegistry;
use aspect_core::error::AspectError;
use aspect_core::joinpoint::JoinPoint;
use aspect_core::value::Value;
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static CURRENT_PROXY: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// The type name of the proxy currently dispatching on this thread, if
/// any call is in progress through an `exposed` [`ProxyFactory`]. Backs
/// the `this(name)` pointcut primitive.
pub fn current_proxy() -> Option<String> {
    CURRENT_PROXY.with(|slot| slot.borrow().clone())
}

/// One installed `(kind, pointcutText)` binding, tracked for
/// introspection and for `dispose`'s list-clearing contract.
#[derive(Debug, Clone)]
pub struct AddedAdvice {
    /// The advice kind this binding installed.
    pub kind: &'static str,
    /// The pointcut text it was installed against.
    pub pointcut_text: String,
}

/// Builds and owns proxies over a single target class.
pub struct ProxyFactory {
    target: String,
    class_registry: Arc<ClassRegistry>,
    added_advices: Vec<AddedAdvice>,
    added_interfaces: Vec<String>,
    use_class_proxy: bool,
    use_aspectj_style: bool,
    frozen: bool,
    exposed: bool,
}

impl ProxyFactory {
    /// Build a factory over `target`'s registered methods.
    pub fn new(target: impl Into<String>, class_registry: Arc<ClassRegistry>) -> Self {
        Self {
            target: target.into(),
            class_registry,
            added_advices: Vec::new(),
            added_interfaces: Vec::new(),
            use_class_proxy: false,
            use_aspectj_style: false,
            frozen: false,
            exposed: false,
        }
    }

    /// Set the policy flags the weaver snapshots at boot.
    pub fn set_flags(&mut self, use_class_proxy: bool, use_aspectj_style: bool, frozen: bool, exposed: bool) {
        self.use_class_proxy = use_class_proxy;
        self.use_aspectj_style = use_aspectj_style;
        self.exposed = exposed;
        // `frozen` is set last: once raised, nothing else about this
        // factory should change.
        self.frozen = frozen;
    }

    /// Record that `kind` advice was installed against `pointcut_text`.
    /// Refused once frozen (spec.md §7 "Policy violation").
    pub fn track_advice(&mut self, kind: &'static str, pointcut_text: impl Into<String>) -> Result<(), AspectError> {
        if self.frozen {
            return Err(AspectError::policy_violation(
                "cannot mutate a frozen ProxyFactory",
            ));
        }
        self.added_advices.push(AddedAdvice {
            kind,
            pointcut_text: pointcut_text.into(),
        });
        Ok(())
    }

    /// Declare an additional interface this proxy should present.
    /// Refused once frozen.
    pub fn add_interface(&mut self, name: impl Into<String>) -> Result<(), AspectError> {
        if self.frozen {
            return Err(AspectError::policy_violation(
                "cannot mutate a frozen ProxyFactory",
            ));
        }
        self.added_interfaces.push(name.into());
        Ok(())
    }

    /// The bindings installed so far.
    pub fn added_advices(&self) -> &[AddedAdvice] {
        &self.added_advices
    }

    /// Whether this factory uses the AspectJ-style per-access dispatch
    /// mode (spec.md §4.9's substring-containment match, Open Question
    /// #3) rather than the prototype-overlay default.
    pub fn use_aspectj_style(&self) -> bool {
        self.use_aspectj_style
    }

    /// Dispatch a call through this factory's proxy: look up `method` on
    /// the target class, and, if `exposed`, publish the proxy's type in
    /// the current-proxy slot for the extent of the call.
    pub fn call(&self, method: &str, jp: &JoinPoint, args: &[Value]) -> Result<Value, AspectError> {
        let descriptor = self
            .class_registry
            .get_method(&self.target, method)
            .ok_or_else(|| AspectError::reference(format!("missing method `{}::{method}`", self.target)))?;

        if self.exposed {
            CURRENT_PROXY.with(|slot| *slot.borrow_mut() = Some(self.target.clone()));
            let result = (descriptor.func)(jp, args);
            CURRENT_PROXY.with(|slot| *slot.borrow_mut() = None);
            result
        } else {
            (descriptor.func)(jp, args)
        }
    }

    /// Revoke, clear lists, reset flags (spec.md §4.9 `dispose`).
    pub fn dispose(&mut self) {
        self.added_advices.clear();
        self.added_interfaces.clear();
        self.use_class_proxy = false;
        self.use_aspectj_style = false;
        self.frozen = false;
        self.exposed = false;
    }
}
