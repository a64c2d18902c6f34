//! Weaver (C10): boot/dispose lifecycle tying every other component
//! together.

use crate::advice_registry::{AdviceArgs, AdviceKind, AdviceRecord, AdviceRegistry};
use crate::aspect_module::AspectModule;
use crate::class_registry::ClassRegistry;
use crate::config::{AdviceKindConfig, AdvisorExpression, AopConfig};
use crate::decorators::{wrap_after, wrap_after_returning, wrap_after_throwing, wrap_around, wrap_before};
use crate::proxy::ProxyFactory;
use aspect_core::advisor::{AdviceFn, Advisor, Matcher};
use aspect_core::error::AspectError;
use aspect_core::joinpoint::JoinPoint;
use aspect_core::metadata::MetadataStore;
use aspect_core::pointcut::{PointcutExpression, PointcutRegistry};
use aspect_core::value::{Typed, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Default, Clone, Copy)]
struct PolicyFlags {
    proxy_target_class: bool,
    use_aspect_j: bool,
    frozen: bool,
    expose_proxy: bool,
}

/// Ties the pointcut registry, metadata store, advice registry, class
/// registry and live proxy set together behind one boot/dispose
/// lifecycle. Instantiate one per test or per application — per Design
/// Note §9, this is deliberately not a global singleton.
pub struct Weaver {
    class_registry: Arc<ClassRegistry>,
    pointcut_registry: PointcutRegistry,
    pointcut_texts: RwLock<HashMap<String, String>>,
    metadata: MetadataStore,
    advice_registry: Arc<AdviceRegistry>,
    proxies: RwLock<HashMap<String, ProxyFactory>>,
    advisors: RwLock<Vec<Arc<Advisor>>>,
    flags: RwLock<PolicyFlags>,
}

impl Weaver {
    /// Build a weaver over a caller-owned class registry.
    pub fn new(class_registry: Arc<ClassRegistry>) -> Self {
        Self {
            class_registry,
            pointcut_registry: PointcutRegistry::new(),
            pointcut_texts: RwLock::new(HashMap::new()),
            metadata: MetadataStore::new(),
            advice_registry: Arc::new(AdviceRegistry::new()),
            proxies: RwLock::new(HashMap::new()),
            advisors: RwLock::new(Vec::new()),
            flags: RwLock::new(PolicyFlags::default()),
        }
    }

    /// The metadata side-channel this weaver owns.
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// The class registry this weaver was built over.
    pub fn class_registry(&self) -> &Arc<ClassRegistry> {
        &self.class_registry
    }

    /// The advisors resolved by the most recent `boot` call.
    pub fn advisors(&self) -> Vec<Arc<Advisor>> {
        self.advisors.read().unwrap().clone()
    }

    /// Run the full boot contract (spec.md §4.10).
    pub fn boot(&self, config: &AopConfig, modules: &HashMap<String, AspectModule>) -> Result<(), AspectError> {
        {
            let mut flags = self.flags.write().unwrap();
            flags.proxy_target_class = config.proxy_target_class;
            flags.use_aspect_j = config.use_aspect_j;
            flags.frozen = config.frozen;
            flags.expose_proxy = config.expose_proxy;
        }

        for pc in config.pointcuts.iter().flatten() {
            self.register_pointcut(&pc.id, &pc.expression)?;
        }

        for advisor_config in config.advisors.iter().flatten() {
            let module = modules.get(&advisor_config.module_ref).ok_or_else(|| {
                AspectError::reference(format!("missing aspect module `{}`", advisor_config.module_ref))
            })?;
            let body = module.methods.get(&advisor_config.advice.method).ok_or_else(|| {
                AspectError::reference(format!(
                    "missing advice method `{}` on module `{}`",
                    advisor_config.advice.method, advisor_config.module_ref
                ))
            })?;
            let matcher = build_matcher(&advisor_config.expression);
            let advice: AdviceFn = adapt_advice_body(Arc::clone(body));
            self.advisors
                .write()
                .unwrap()
                .push(Arc::new(Advisor::new(advice, matcher)));
        }

        let mut aspects = config.aspects.clone();
        aspects.sort_by_key(|a| a.order.unwrap_or(0));

        let advisors = self.advisors();

        for aspect in &aspects {
            let module = modules
                .get(&aspect.module_ref)
                .ok_or_else(|| AspectError::reference(format!("missing aspect module `{}`", aspect.module_ref)))?;

            self.metadata.set_class(&module.target_class, "aspect", Value::Bool(true));

            for pc in aspect.pointcuts.iter().flatten() {
                self.register_pointcut(&pc.id, &pc.expression)?;
            }

            let mut factory = ProxyFactory::new(module.target_class.clone(), Arc::clone(&self.class_registry));
            {
                let flags = *self.flags.read().unwrap();
                factory.set_flags(flags.proxy_target_class, flags.use_aspect_j, flags.frozen, flags.expose_proxy);
            }

            for advice in &aspect.advices {
                let pointcut_text = self.resolve_pointcut_text(advice)?;
                let arg_names: Vec<String> = advice
                    .arg_names
                    .as_deref()
                    .map(|names| names.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default();

                let body = module.methods.get(&advice.method).ok_or_else(|| {
                    AspectError::reference(format!(
                        "missing advice method `{}` on module `{}`",
                        advice.method, aspect.module_ref
                    ))
                })?;

                let target_method = match &advice.target_method {
                    Some(name) => name.clone(),
                    None => target_method_from_pointcut(&pointcut_text)?,
                };

                let descriptor = self
                    .class_registry
                    .get_method(&module.target_class, &target_method)
                    .ok_or_else(|| {
                        AspectError::reference(format!(
                            "missing method `{}::{}` on prototype",
                            module.target_class, target_method
                        ))
                    })?;

                let kind = match advice.kind {
                    AdviceKindConfig::Before => AdviceKind::Before,
                    AdviceKindConfig::After => AdviceKind::After,
                    AdviceKindConfig::AfterReturning => AdviceKind::AfterReturning,
                    AdviceKindConfig::AfterThrowing => AdviceKind::AfterThrowing,
                    AdviceKindConfig::Around => AdviceKind::Around,
                };

                self.advice_registry.install(
                    module.target_class.clone(),
                    kind,
                    AdviceRecord {
                        pointcut_text: pointcut_text.clone(),
                        arg_names,
                        body: Arc::clone(body),
                    },
                );

                let wrapped = match kind {
                    AdviceKind::Before => wrap_before(
                        Arc::clone(&self.advice_registry),
                        module.target_class.clone(),
                        pointcut_text.clone(),
                        Some(descriptor.info.clone()),
                        advisors.clone(),
                        descriptor.func.clone(),
                    ),
                    AdviceKind::After => wrap_after(
                        Arc::clone(&self.advice_registry),
                        module.target_class.clone(),
                        pointcut_text.clone(),
                        descriptor.func.clone(),
                    ),
                    AdviceKind::AfterReturning => wrap_after_returning(
                        Arc::clone(&self.advice_registry),
                        module.target_class.clone(),
                        pointcut_text.clone(),
                        descriptor.func.clone(),
                    ),
                    AdviceKind::AfterThrowing => wrap_after_throwing(
                        Arc::clone(&self.advice_registry),
                        module.target_class.clone(),
                        pointcut_text.clone(),
                        descriptor.func.clone(),
                    ),
                    AdviceKind::Around => wrap_around(
                        Arc::clone(&self.advice_registry),
                        module.target_class.clone(),
                        pointcut_text.clone(),
                        descriptor.func.clone(),
                    ),
                };

                self.class_registry
                    .redefine_method(&module.target_class, &target_method, wrapped)?;
                factory.track_advice(kind_name(kind), pointcut_text)?;
            }

            log::debug!(
                "wove aspect `{}` onto `{}` with {} advice(s)",
                aspect.id,
                module.target_class,
                aspect.advices.len()
            );
            self.proxies.write().unwrap().insert(aspect.id.clone(), factory);
        }

        log::info!("weaver boot complete: {} aspect(s) woven", aspects.len());
        Ok(())
    }

    /// Dispose every live proxy, clear every table, reset policy flags
    /// (spec.md §4.10 dispose contract).
    pub fn dispose(&self) {
        log::info!("weaver dispose: tearing down {} live proxy(ies)", self.proxies.read().unwrap().len());
        for factory in self.proxies.write().unwrap().values_mut() {
            factory.dispose();
        }
        self.proxies.write().unwrap().clear();
        self.advisors.write().unwrap().clear();
        self.pointcut_texts.write().unwrap().clear();
        self.advice_registry.clear();
        self.metadata.clear();
        self.class_registry.clear();
        *self.flags.write().unwrap() = PolicyFlags::default();
    }

    fn register_pointcut(&self, id: &str, expression: &str) -> Result<(), AspectError> {
        let parsed = PointcutExpression::parse(expression, &self.pointcut_registry)?;
        self.pointcut_registry.set(id, parsed);
        self.pointcut_texts
            .write()
            .unwrap()
            .insert(id.to_string(), expression.to_string());
        Ok(())
    }

    fn resolve_pointcut_text(&self, advice: &crate::config::AdviceConfig) -> Result<String, AspectError> {
        if let Some(text) = &advice.pointcut {
            PointcutExpression::parse(text, &self.pointcut_registry)?;
            return Ok(text.clone());
        }
        if let Some(reference) = &advice.pointcut_ref {
            return self
                .pointcut_texts
                .read()
                .unwrap()
                .get(reference)
                .cloned()
                .ok_or_else(|| AspectError::reference(format!("unknown pointcut ref `{reference}`")));
        }
        Err(AspectError::reference("advice has neither `pointcut` nor `pointcutRef`"))
    }
}

/// Pull the target application method's name out of a resolved
/// pointcut's `execution(pattern)` clause, e.g. `execution(* svc::
/// Service.greet(..))` yields `"greet"`. This is how a woven advice
/// finds the method it actually wraps on the [`ClassRegistry`] — the
/// module's advice method (`AdviceConfig.method`) only names the advice
/// body, never the application method.
fn target_method_from_pointcut(pointcut_text: &str) -> Result<String, AspectError> {
    let open = pointcut_text.find("execution(").ok_or_else(|| {
        AspectError::reference(format!(
            "cannot derive a target method from pointcut `{pointcut_text}`: no `execution(...)` clause; set `targetMethod` explicitly"
        ))
    })?;
    let body_start = open + "execution(".len();

    let mut depth = 1i32;
    let mut close = None;
    for (i, ch) in pointcut_text[body_start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(body_start + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close.ok_or_else(|| AspectError::parse(pointcut_text.to_string()))?;
    let pattern = &pointcut_text[body_start..close];

    let signature = pattern
        .split_whitespace()
        .next_back()
        .ok_or_else(|| AspectError::parse(pattern.to_string()))?;
    let owner_and_method = signature.split('(').next().unwrap_or(signature);
    owner_and_method
        .rsplit_once('.')
        .map(|(_, method)| method.to_string())
        .ok_or_else(|| AspectError::parse(pattern.to_string()))
}

fn kind_name(kind: AdviceKind) -> &'static str {
    match kind {
        AdviceKind::Before => "before",
        AdviceKind::After => "after",
        AdviceKind::AfterReturning => "afterReturning",
        AdviceKind::AfterThrowing => "afterThrowing",
        AdviceKind::Around => "around",
    }
}

fn build_matcher(expression: &AdvisorExpression) -> Matcher {
    match expression {
        AdvisorExpression::ClassFilter(cfg) => {
            let class_name = cfg.class_name.clone();
            Matcher::ClassFilter(Arc::new(move |ty: &str| ty == class_name))
        }
        AdvisorExpression::MethodMatcher(cfg) => {
            let method_name = cfg.method_name.clone();
            let param_types = cfg.param_types.clone();
            Matcher::MethodMatcher(Arc::new(move |m, _ty, _args| {
                m.name == method_name && param_types.as_ref().map_or(true, |pts| pts == &m.param_types)
            }))
        }
    }
}

/// Adapts a C6 [`crate::advice_registry::AdviceBody`] (which expects a
/// full `AdviceArgs` built from an in-flight call) into the simpler C7
/// advisor-advice shape: `(receiver, args) -> result`, synthesizing a
/// class-only `JoinPoint` around the receiver. Errors raised inside the
/// body are swallowed to `Value::Unit` since advisors, per spec.md §4.7,
/// have no propagation path of their own.
fn adapt_advice_body(body: Arc<dyn Fn(&AdviceArgs) -> Result<Value, AspectError> + Send + Sync>) -> AdviceFn {
    Arc::new(move |receiver: &Arc<dyn Typed>, args: &[Value]| {
        let jp = JoinPoint::new(Arc::clone(receiver), Option::<String>::None, args.to_vec());
        let advice_args = AdviceArgs {
            join_point: &jp,
            result: None,
            error: None,
            proceed: None,
            arg_names: &[],
            actuals: args,
        };
        body(&advice_args).unwrap_or(Value::Unit)
    })
}
