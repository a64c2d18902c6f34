//! Advisor: one advice function bound to one pointcut (C7).

use crate::joinpoint::JoinPoint;
use crate::pointcut::MethodInfo;
use crate::value::{Typed, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An advice body: `(receiver, args) -> result`.
pub type AdviceFn = Arc<dyn Fn(&Arc<dyn Typed>, &[Value]) -> Value + Send + Sync>;

/// The predicate half of an advisor, spec.md §3's "matcher is either a
/// class filter or a method matcher".
#[derive(Clone)]
pub enum Matcher {
    /// `type -> bool`.
    ClassFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    /// `(method, type, args) -> bool`.
    MethodMatcher(Arc<dyn Fn(&MethodInfo, &str, &[Value]) -> bool + Send + Sync>),
}

/// Pairs one [`AdviceFn`] with one [`Matcher`] and tracks whether the
/// matcher fired on the most recent [`Advisor::execute`] call.
pub struct Advisor {
    advice: AdviceFn,
    matcher: Matcher,
    last_fired: AtomicBool,
}

impl Advisor {
    /// Build an advisor from an advice body and its selecting matcher.
    pub fn new(advice: AdviceFn, matcher: Matcher) -> Self {
        Self {
            advice,
            matcher,
            last_fired: AtomicBool::new(false),
        }
    }

    /// Whether the matcher fired on the most recent `execute` call.
    pub fn last_fired(&self) -> bool {
        self.last_fired.load(Ordering::SeqCst)
    }

    /// Run the C7 execute contract: clear `lastFired`, test the matcher
    /// against `join_point` (and `method`, for a method matcher), fire the
    /// advice and set `lastFired` on a match, else return the "unset"
    /// value `Value::Unit`.
    pub fn execute(
        &self,
        join_point: &JoinPoint,
        method: Option<&MethodInfo>,
        args: &[Value],
    ) -> Value {
        self.last_fired.store(false, Ordering::SeqCst);

        let fires = match &self.matcher {
            Matcher::ClassFilter(filter) => filter(join_point.owner_type()),
            Matcher::MethodMatcher(matches) => method
                .is_some_and(|m| matches(m, join_point.owner_type(), join_point.args())),
        };

        if fires {
            let result = (self.advice)(join_point.target(), args);
            self.last_fired.store(true, Ordering::SeqCst);
            result
        } else {
            Value::Unit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Svc;
    impl Typed for Svc {
        fn type_name(&self) -> &'static str {
            "svc"
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn class_filter_fires_and_sets_last_fired() {
        let advice: AdviceFn = Arc::new(|_receiver, _args| Value::Int(1));
        let matcher = Matcher::ClassFilter(Arc::new(|ty: &str| ty == "svc"));
        let advisor = Advisor::new(advice, matcher);

        let jp = JoinPoint::new(Arc::new(Svc), Some("greet"), vec![]);
        let result = advisor.execute(&jp, None, &[]);

        assert!(advisor.last_fired());
        assert!(matches!(result, Value::Int(1)));
    }

    #[test]
    fn non_matching_class_filter_returns_unset_value() {
        let advice: AdviceFn = Arc::new(|_receiver, _args| Value::Int(1));
        let matcher = Matcher::ClassFilter(Arc::new(|ty: &str| ty == "other"));
        let advisor = Advisor::new(advice, matcher);

        let jp = JoinPoint::new(Arc::new(Svc), Some("greet"), vec![]);
        let result = advisor.execute(&jp, None, &[]);

        assert!(!advisor.last_fired());
        assert!(matches!(result, Value::Unit));
    }

    #[test]
    fn method_matcher_requires_a_method_to_fire() {
        let advice: AdviceFn = Arc::new(|_receiver, _args| Value::Int(2));
        let matcher = Matcher::MethodMatcher(Arc::new(|m: &MethodInfo, _ty, _args| m.name == "greet"));
        let advisor = Advisor::new(advice, matcher);

        let jp = JoinPoint::new(Arc::new(Svc), Some("greet"), vec![]);
        assert!(matches!(advisor.execute(&jp, None, &[]), Value::Unit));
        assert!(!advisor.last_fired());

        let method = MethodInfo::new("greet", vec![]);
        let result = advisor.execute(&jp, Some(&method), &[]);
        assert!(advisor.last_fired());
        assert!(matches!(result, Value::Int(2)));
    }

    #[test]
    fn last_fired_resets_between_calls() {
        let advice: AdviceFn = Arc::new(|_receiver, _args| Value::Unit);
        let matcher = Matcher::ClassFilter(Arc::new(|ty: &str| ty == "svc"));
        let advisor = Advisor::new(advice, matcher);

        let jp = JoinPoint::new(Arc::new(Svc), Some("greet"), vec![]);
        advisor.execute(&jp, None, &[]);
        assert!(advisor.last_fired());

        let other = JoinPoint::new(Arc::new(Svc), Some("greet"), vec![]);
        let matcher2 = Matcher::ClassFilter(Arc::new(|ty: &str| ty == "nope"));
        let advisor2 = Advisor::new(Arc::new(|_r, _a| Value::Unit), matcher2);
        advisor2.execute(&other, None, &[]);
        assert!(!advisor2.last_fired());
    }
}
