//! Call-timing advice, collecting per-method statistics via an `around`
//! advice body.

use aspect_runtime::advice_registry::AdviceBody;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Statistics for a single method's observed call durations.
#[derive(Debug, Clone)]
pub struct FunctionStats {
    /// The join point signature these stats are keyed by.
    pub name: String,
    /// Number of calls observed.
    pub count: u64,
    /// Sum of all observed call durations.
    pub total_duration: Duration,
    /// Fastest observed call.
    pub min_duration: Duration,
    /// Slowest observed call.
    pub max_duration: Duration,
}

impl FunctionStats {
    fn new(name: String) -> Self {
        Self {
            name,
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
        }
    }

    fn record(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
    }

    /// Mean call duration, or zero if no calls have been observed.
    pub fn average_duration(&self) -> Duration {
        if self.count > 0 {
            self.total_duration / self.count as u32
        } else {
            Duration::ZERO
        }
    }
}

/// Collects call-duration statistics for whichever join points an `around`
/// advice built from [`TimingAdvice::around_advice`] is woven onto.
///
/// Cloning shares the underlying stats table.
#[derive(Clone)]
pub struct TimingAdvice {
    stats: Arc<Mutex<HashMap<String, FunctionStats>>>,
    threshold_ms: Option<u64>,
    print_on_complete: bool,
}

impl TimingAdvice {
    /// A collector with no slow-call threshold and no per-call printing.
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(HashMap::new())),
            threshold_ms: None,
            print_on_complete: false,
        }
    }

    /// Log a warning for any call slower than `threshold_ms`.
    pub fn with_threshold(mut self, threshold_ms: u64) -> Self {
        self.threshold_ms = Some(threshold_ms);
        self
    }

    /// Log every call's duration at [`log::Level::Debug`] as it completes.
    pub fn print_on_complete(mut self) -> Self {
        self.print_on_complete = true;
        self
    }

    /// Snapshot the stats recorded for `name` (the join point's `Display`
    /// rendering), if any calls have been observed.
    pub fn get_stats(&self, name: &str) -> Option<FunctionStats> {
        self.stats.lock().get(name).cloned()
    }

    /// Snapshot stats for every method observed so far.
    pub fn all_stats(&self) -> Vec<FunctionStats> {
        self.stats.lock().values().cloned().collect()
    }

    /// Discard all recorded statistics.
    pub fn clear(&self) {
        self.stats.lock().clear();
    }

    fn record_timing(&self, name: &str, duration: Duration) {
        self.stats
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| FunctionStats::new(name.to_string()))
            .record(duration);
    }

    /// Build an `around` advice body that times `proceed` and records the
    /// elapsed duration keyed by the join point's signature.
    pub fn around_advice(&self) -> AdviceBody {
        let this = self.clone();
        Arc::new(move |args| {
            let proceed = args
                .proceed
                .as_ref()
                .expect("around advice always receives a proceed thunk");
            let name = args.join_point.to_string();
            let started = Instant::now();
            let result = proceed();
            let duration = started.elapsed();

            this.record_timing(&name, duration);
            if let Some(threshold_ms) = this.threshold_ms {
                if duration.as_millis() > threshold_ms as u128 {
                    log::warn!("{name} took {duration:?}, over the {threshold_ms}ms threshold");
                }
            }
            if this.print_on_complete {
                log::debug!("{name} took {duration:?}");
            }

            result
        })
    }
}

impl Default for TimingAdvice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspect_core::joinpoint::JoinPoint;
    use aspect_core::value::{Typed, Value};
    use aspect_runtime::advice_registry::AdviceArgs;
    use std::sync::Arc as StdArc;

    struct Svc;
    impl Typed for Svc {
        fn type_name(&self) -> &'static str {
            "svc::Service"
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn around_advice_records_one_call_per_invocation() {
        let timing = TimingAdvice::new();
        let body = timing.around_advice();
        let jp = JoinPoint::new(StdArc::new(Svc), Some("greet"), vec![]);
        let proceed: Arc<dyn Fn() -> Result<Value, aspect_core::error::AspectError> + Send + Sync> =
            Arc::new(|| Ok(Value::Int(1)));
        let args = AdviceArgs {
            join_point: &jp,
            result: None,
            error: None,
            proceed: Some(proceed),
            arg_names: &[],
            actuals: &[],
        };

        body(&args).unwrap();
        body(&args).unwrap();

        let name = jp.to_string();
        let stats = timing.get_stats(&name).unwrap();
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn unknown_function_has_no_stats() {
        let timing = TimingAdvice::new();
        assert!(timing.get_stats("nope").is_none());
    }

    #[test]
    fn threshold_builder_is_recorded() {
        let timing = TimingAdvice::new().with_threshold(100).print_on_complete();
        assert_eq!(timing.threshold_ms, Some(100));
        assert!(timing.print_on_complete);
    }
}
