//! Advice decorators (C8): the five wrapper operations spec.md §4.8 names.
//!
//! Each decorator closes over an [`AdviceRegistry`], a target class name
//! and pointcut text, and the method's current callable, and returns a
//! new callable implementing that kind's sequencing. Installing a
//! decorator is simply handing its result to
//! [`crate::class_registry::ClassRegistry::redefine_method`].

use crate::advice_registry::{AdviceArgs, AdviceKind, AdviceRecord, AdviceRegistry};
use crate::class_registry::MethodFn;
use aspect_core::advisor::Advisor;
use aspect_core::error::AspectError;
use aspect_core::joinpoint::JoinPoint;
use aspect_core::pointcut::MethodInfo;
use aspect_core::value::Value;
use std::sync::Arc;

/// `before` — run every matching advice, then give each advisor bound to
/// this method a chance to replace the original call entirely (spec.md
/// §4.8). Advisors are independent of the pointcut path, so each one
/// re-tests its own [`aspect_core::advisor::Matcher`] against `method_info`
/// at call time; the first to fire wins.
pub fn wrap_before(
    advice_registry: Arc<AdviceRegistry>,
    class: String,
    pointcut_text: String,
    method_info: Option<MethodInfo>,
    advisors: Vec<Arc<Advisor>>,
    original: MethodFn,
) -> MethodFn {
    Arc::new(move |jp: &JoinPoint, args: &[Value]| {
        for record in advice_registry.matching(&class, AdviceKind::Before, &pointcut_text) {
            run_advice(&record, jp, args, None, None)?;
        }
        for advisor in &advisors {
            let result = advisor.execute(jp, method_info.as_ref(), args);
            if advisor.last_fired() {
                return Ok(result);
            }
        }
        original(jp, args)
    })
}

/// `after` — runs advice in a guaranteed-release phase on every path.
pub fn wrap_after(
    advice_registry: Arc<AdviceRegistry>,
    class: String,
    pointcut_text: String,
    original: MethodFn,
) -> MethodFn {
    Arc::new(move |jp: &JoinPoint, args: &[Value]| {
        let outcome = original(jp, args);
        for record in advice_registry.matching(&class, AdviceKind::After, &pointcut_text) {
            run_advice(&record, jp, args, None, None)?;
        }
        outcome
    })
}

/// `afterReturning` — advice runs only on normal return, bound to `result`.
pub fn wrap_after_returning(
    advice_registry: Arc<AdviceRegistry>,
    class: String,
    pointcut_text: String,
    original: MethodFn,
) -> MethodFn {
    Arc::new(move |jp: &JoinPoint, args: &[Value]| {
        let result = original(jp, args)?;
        for record in advice_registry.matching(&class, AdviceKind::AfterReturning, &pointcut_text) {
            run_advice(&record, jp, args, Some(&result), None)?;
        }
        Ok(result)
    })
}

/// `afterThrowing` — advice runs only on abrupt termination, bound to
/// `error`; the error is re-propagated after advice runs.
pub fn wrap_after_throwing(
    advice_registry: Arc<AdviceRegistry>,
    class: String,
    pointcut_text: String,
    original: MethodFn,
) -> MethodFn {
    Arc::new(move |jp: &JoinPoint, args: &[Value]| match original(jp, args) {
        Ok(value) => Ok(value),
        Err(error) => {
            for record in advice_registry.matching(&class, AdviceKind::AfterThrowing, &pointcut_text) {
                run_advice(&record, jp, args, None, Some(&error))?;
            }
            Err(error)
        }
    })
}

/// `around` — advice runs in place of the original, given a synchronous
/// proceed thunk as its final binding. Multiple installed advices chain:
/// the first's proceed invokes the second, and so on, with the last
/// proceed invoking the original.
pub fn wrap_around(
    advice_registry: Arc<AdviceRegistry>,
    class: String,
    pointcut_text: String,
    original: MethodFn,
) -> MethodFn {
    Arc::new(move |jp: &JoinPoint, args: &[Value]| {
        let records = advice_registry.matching(&class, AdviceKind::Around, &pointcut_text);
        invoke_around(0, &records, &original, jp, args)
    })
}

fn invoke_around(
    idx: usize,
    records: &[AdviceRecord],
    original: &MethodFn,
    jp: &JoinPoint,
    args: &[Value],
) -> Result<Value, AspectError> {
    match records.get(idx) {
        None => original(jp, args),
        Some(record) => {
            let proceed: Arc<dyn Fn() -> Result<Value, AspectError> + Send + Sync + '_> =
                Arc::new(move || invoke_around(idx + 1, records, original, jp, args));
            let advice_args = AdviceArgs {
                join_point: jp,
                result: None,
                error: None,
                proceed: Some(proceed),
                arg_names: &record.arg_names,
                actuals: args,
            };
            (record.body)(&advice_args)
        }
    }
}

fn run_advice(
    record: &AdviceRecord,
    jp: &JoinPoint,
    args: &[Value],
    result: Option<&Value>,
    error: Option<&AspectError>,
) -> Result<Value, AspectError> {
    let advice_args = AdviceArgs {
        join_point: jp,
        result,
        error,
        proceed: None,
        arg_names: &record.arg_names,
        actuals: args,
    };
    (record.body)(&advice_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspect_core::value::Typed;
    use std::sync::Mutex;

    struct Svc;
    impl Typed for Svc {
        fn type_name(&self) -> &'static str {
            "svc::Service"
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn jp() -> JoinPoint {
        JoinPoint::new(Arc::new(Svc), Some("greet"), vec![])
    }

    #[test]
    fn before_runs_ahead_of_the_original() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let advice_registry = Arc::new(AdviceRegistry::new());
        let log_clone = Arc::clone(&log);
        advice_registry.install(
            "svc::Service",
            AdviceKind::Before,
            AdviceRecord {
                pointcut_text: "p".into(),
                arg_names: vec![],
                body: Arc::new(move |_args| {
                    log_clone.lock().unwrap().push("advice".to_string());
                    Ok(Value::Unit)
                }),
            },
        );
        let log_clone2 = Arc::clone(&log);
        let original: MethodFn = Arc::new(move |_jp, _args| {
            log_clone2.lock().unwrap().push("original".to_string());
            Ok(Value::Int(0))
        });

        let wrapped = wrap_before(advice_registry, "svc::Service".into(), "p".into(), None, vec![], original);
        let result = wrapped(&jp(), &[]).unwrap();

        assert!(matches!(result, Value::Int(0)));
        assert_eq!(log.lock().unwrap().as_slice(), ["advice", "original"]);
    }

    #[test]
    fn before_advisor_fires_and_replaces_the_original() {
        let advice_registry = Arc::new(AdviceRegistry::new());
        let method_info = MethodInfo::new("greet", vec![]);
        let matcher = aspect_core::advisor::Matcher::ClassFilter(Arc::new(|ty: &str| ty == "svc::Service"));
        let advice: aspect_core::AdviceFn = Arc::new(|_receiver, _args| Value::Int(99));
        let advisor = Arc::new(Advisor::new(advice, matcher));
        let original: MethodFn = Arc::new(|_jp, _args| Ok(Value::Int(0)));

        let wrapped = wrap_before(
            advice_registry,
            "svc::Service".into(),
            "p".into(),
            Some(method_info),
            vec![advisor],
            original,
        );
        let result = wrapped(&jp(), &[]).unwrap();

        assert!(matches!(result, Value::Int(99)));
    }

    #[test]
    fn after_returning_binds_result() {
        let advice_registry = Arc::new(AdviceRegistry::new());
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        advice_registry.install(
            "svc::Service",
            AdviceKind::AfterReturning,
            AdviceRecord {
                pointcut_text: "p".into(),
                arg_names: vec!["result".into()],
                body: Arc::new(move |args| {
                    *seen_clone.lock().unwrap() = args.resolve("result");
                    Ok(Value::Unit)
                }),
            },
        );
        let original: MethodFn = Arc::new(|_jp, _args| Ok(Value::Int(5)));
        let wrapped = wrap_after_returning(advice_registry, "svc::Service".into(), "p".into(), original);

        let result = wrapped(&jp(), &[]).unwrap();
        assert!(matches!(result, Value::Int(5)));
        assert!(matches!(seen.lock().unwrap().as_ref(), Some(Value::Int(5))));
    }

    #[test]
    fn after_throwing_receives_error_and_rethrows() {
        let advice_registry = Arc::new(AdviceRegistry::new());
        let fired = Arc::new(Mutex::new(false));
        let fired_clone = Arc::clone(&fired);
        advice_registry.install(
            "svc::Service",
            AdviceKind::AfterThrowing,
            AdviceRecord {
                pointcut_text: "p".into(),
                arg_names: vec![],
                body: Arc::new(move |_args| {
                    *fired_clone.lock().unwrap() = true;
                    Ok(Value::Unit)
                }),
            },
        );
        let original: MethodFn = Arc::new(|_jp, _args| Err(AspectError::advice(std::io::Error::new(std::io::ErrorKind::Other, "boom"))));
        let wrapped = wrap_after_throwing(advice_registry, "svc::Service".into(), "p".into(), original);

        let err = wrapped(&jp(), &[]).unwrap_err();
        assert!(matches!(err, AspectError::Advice(_)));
        assert!(*fired.lock().unwrap());
    }

    #[test]
    fn around_proceed_adjusts_the_result() {
        let advice_registry = Arc::new(AdviceRegistry::new());
        advice_registry.install(
            "svc::Service",
            AdviceKind::Around,
            AdviceRecord {
                pointcut_text: "p".into(),
                arg_names: vec![],
                body: Arc::new(|args| {
                    let inner = (args.proceed.as_ref().unwrap())()?;
                    match inner {
                        Value::Int(n) => Ok(Value::Int(n + 1)),
                        other => Ok(other),
                    }
                }),
            },
        );
        let original: MethodFn = Arc::new(|_jp, _args| Ok(Value::Int(10)));
        let wrapped = wrap_around(advice_registry, "svc::Service".into(), "p".into(), original);

        let result = wrapped(&jp(), &[]).unwrap();
        assert!(matches!(result, Value::Int(11)));
    }

    #[test]
    fn after_runs_on_error_path_too() {
        let advice_registry = Arc::new(AdviceRegistry::new());
        let fired = Arc::new(Mutex::new(false));
        let fired_clone = Arc::clone(&fired);
        advice_registry.install(
            "svc::Service",
            AdviceKind::After,
            AdviceRecord {
                pointcut_text: "p".into(),
                arg_names: vec![],
                body: Arc::new(move |_args| {
                    *fired_clone.lock().unwrap() = true;
                    Ok(Value::Unit)
                }),
            },
        );
        let original: MethodFn = Arc::new(|_jp, _args| Err(AspectError::advice(std::io::Error::new(std::io::ErrorKind::Other, "boom"))));
        let wrapped = wrap_after(advice_registry, "svc::Service".into(), "p".into(), original);

        assert!(wrapped(&jp(), &[]).is_err());
        assert!(*fired.lock().unwrap());
    }
}
