//! End-to-end weaving scenarios: a config, a module table, a boot call,
//! and an assertion about what calling the woven method actually did.

use aspect_core::error::AspectError;
use aspect_core::pointcut::MethodInfo;
use aspect_core::value::{Typed, Value};
use aspect_runtime::advice_registry::AdviceArgs;
use aspect_runtime::aspect_module::AspectModule;
use aspect_runtime::class_registry::{ClassRegistry, MethodDescriptor};
use aspect_runtime::config::{AdviceConfig, AdviceKindConfig, AopConfig, AspectConfig};
use aspect_runtime::weaver::Weaver;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct Service;
impl Typed for Service {
    fn type_name(&self) -> &'static str {
        "svc::Service"
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn greet_registry() -> Arc<ClassRegistry> {
    let registry = Arc::new(ClassRegistry::new());
    registry.define_method(
        "svc::Service",
        "greet",
        MethodDescriptor {
            info: MethodInfo::new("greet", vec!["String".into()]),
            func: Arc::new(|_jp, args| match args.first() {
                Some(Value::Str(name)) => Ok(Value::str(format!("hello, {name}"))),
                _ => Ok(Value::Unit),
            }),
        },
    );
    registry
}

fn before_advice(kind: AdviceKindConfig, method: &str, pointcut: &str) -> AdviceConfig {
    AdviceConfig {
        kind,
        method: method.to_string(),
        target_method: None,
        pointcut: Some(pointcut.to_string()),
        pointcut_ref: None,
        returning: None,
        throwing: None,
        arg_names: None,
    }
}

/// S2: `afterReturning` binds the method's actual return value.
#[test]
fn after_returning_binds_the_actual_result() {
    let class_registry = greet_registry();
    let weaver = Weaver::new(Arc::clone(&class_registry));

    let seen = Arc::new(Mutex::new(None));
    let seen_clone = Arc::clone(&seen);
    let module = AspectModule::new("svc::Service").with_method(
        "captureResult",
        Arc::new(move |args: &AdviceArgs| {
            *seen_clone.lock().unwrap() = args.result.cloned();
            Ok(Value::Unit)
        }),
    );
    let mut modules = HashMap::new();
    modules.insert("capture".to_string(), module);

    let config = AopConfig {
        pointcuts: None,
        aspects: vec![AspectConfig {
            id: "capture-aspect".into(),
            module_ref: "capture".into(),
            order: None,
            pointcuts: None,
            advices: vec![before_advice(
                AdviceKindConfig::AfterReturning,
                "captureResult",
                "execution(* svc::Service.greet(..))",
            )],
        }],
        advisors: None,
        proxy_target_class: false,
        use_aspect_j: false,
        frozen: false,
        expose_proxy: false,
    };
    weaver.boot(&config, &modules).unwrap();

    let descriptor = class_registry.get_method("svc::Service", "greet").unwrap();
    let jp = aspect_core::joinpoint::JoinPoint::new(Arc::new(Service), Some("greet"), vec![Value::str("ada")]);
    let result = (descriptor.func)(&jp, &[Value::str("ada")]).unwrap();

    assert!(matches!(result, Value::Str(ref s) if s == "hello, ada"));
    assert!(matches!(seen.lock().unwrap().as_ref(), Some(Value::Str(s)) if s == "hello, ada"));
}

/// S3: `afterThrowing` receives the propagating error and does not
/// swallow it.
#[test]
fn after_throwing_sees_the_error_and_it_still_propagates() {
    let class_registry = Arc::new(ClassRegistry::new());
    class_registry.define_method(
        "svc::Service",
        "risky",
        MethodDescriptor {
            info: MethodInfo::new("risky", vec![]),
            func: Arc::new(|_jp, _args| {
                Err(AspectError::advice(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "boom",
                )))
            }),
        },
    );
    let weaver = Weaver::new(Arc::clone(&class_registry));

    let caught = Arc::new(Mutex::new(false));
    let caught_clone = Arc::clone(&caught);
    let module = AspectModule::new("svc::Service").with_method(
        "logError",
        Arc::new(move |args: &AdviceArgs| {
            assert!(args.error.is_some());
            *caught_clone.lock().unwrap() = true;
            Ok(Value::Unit)
        }),
    );
    let mut modules = HashMap::new();
    modules.insert("errors".to_string(), module);

    let config = AopConfig {
        pointcuts: None,
        aspects: vec![AspectConfig {
            id: "error-aspect".into(),
            module_ref: "errors".into(),
            order: None,
            pointcuts: None,
            advices: vec![before_advice(
                AdviceKindConfig::AfterThrowing,
                "logError",
                "execution(* svc::Service.risky(..))",
            )],
        }],
        advisors: None,
        proxy_target_class: false,
        use_aspect_j: false,
        frozen: false,
        expose_proxy: false,
    };
    weaver.boot(&config, &modules).unwrap();

    let descriptor = class_registry.get_method("svc::Service", "risky").unwrap();
    let jp = aspect_core::joinpoint::JoinPoint::new(Arc::new(Service), Some("risky"), vec![]);
    let err = (descriptor.func)(&jp, &[]).unwrap_err();

    assert!(matches!(err, AspectError::Advice(_)));
    assert!(*caught.lock().unwrap());
}

/// S6: two aspects on the same method weave in ascending `order`,
/// regardless of their position in the config's aspect list.
#[test]
fn aspects_weave_in_ascending_order_not_config_order() {
    let class_registry = greet_registry();
    let weaver = Weaver::new(Arc::clone(&class_registry));

    let log = Arc::new(Mutex::new(Vec::new()));
    let log_a = Arc::clone(&log);
    let log_b = Arc::clone(&log);
    let mut modules = HashMap::new();
    modules.insert(
        "a".to_string(),
        AspectModule::new("svc::Service").with_method(
            "mark",
            Arc::new(move |_args: &AdviceArgs| {
                log_a.lock().unwrap().push("a");
                Ok(Value::Unit)
            }),
        ),
    );
    modules.insert(
        "b".to_string(),
        AspectModule::new("svc::Service").with_method(
            "mark",
            Arc::new(move |_args: &AdviceArgs| {
                log_b.lock().unwrap().push("b");
                Ok(Value::Unit)
            }),
        ),
    );

    // Listed second-before-first in the config; `order` should still win.
    let config = AopConfig {
        pointcuts: None,
        aspects: vec![
            AspectConfig {
                id: "aspect-b".into(),
                module_ref: "b".into(),
                order: Some(2),
                pointcuts: None,
                advices: vec![before_advice(
                    AdviceKindConfig::Before,
                    "mark",
                    "execution(* svc::Service.greet(..))",
                )],
            },
            AspectConfig {
                id: "aspect-a".into(),
                module_ref: "a".into(),
                order: Some(1),
                pointcuts: None,
                advices: vec![before_advice(
                    AdviceKindConfig::Before,
                    "mark",
                    "execution(* svc::Service.greet(..))",
                )],
            },
        ],
        advisors: None,
        proxy_target_class: false,
        use_aspect_j: false,
        frozen: false,
        expose_proxy: false,
    };
    weaver.boot(&config, &modules).unwrap();

    let descriptor = class_registry.get_method("svc::Service", "greet").unwrap();
    let jp = aspect_core::joinpoint::JoinPoint::new(Arc::new(Service), Some("greet"), vec![Value::str("ada")]);
    (descriptor.func)(&jp, &[Value::str("ada")]).unwrap();

    assert_eq!(log.lock().unwrap().as_slice(), ["a", "b"]);
}
