//! External configuration shape consumed by [`crate::weaver::Weaver::boot`]
//! (spec.md §6). Deserializable with `serde`, the way a boot-time config
//! file loaded from disk or environment would be.

use serde::Deserialize;

/// A named pointcut registered globally at boot.
#[derive(Debug, Clone, Deserialize)]
pub struct PointcutConfig {
    /// The name other expressions reference this pointcut by.
    pub id: String,
    /// The pointcut expression text.
    pub expression: String,
}

/// One advice kind, matching spec.md §6's `AdviceConfig.type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdviceKindConfig {
    /// `before`.
    Before,
    /// `after`.
    After,
    /// `afterReturning`.
    AfterReturning,
    /// `afterThrowing`.
    AfterThrowing,
    /// `around`.
    Around,
}

/// One advice binding inside an aspect.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceConfig {
    /// The advice kind.
    #[serde(rename = "type")]
    pub kind: AdviceKindConfig,
    /// The advice method's name on the aspect module.
    pub method: String,
    /// The application method on the target class this advice wraps. If
    /// absent, derived from the pointcut's `execution(pattern)` clause
    /// (see `weaver::target_method_from_pointcut`).
    #[serde(default)]
    pub target_method: Option<String>,
    /// An inline pointcut expression.
    #[serde(default)]
    pub pointcut: Option<String>,
    /// A reference to a named pointcut registered via [`PointcutConfig`].
    #[serde(default)]
    pub pointcut_ref: Option<String>,
    /// The parameter name `afterReturning` binds the return value to.
    #[serde(default)]
    pub returning: Option<String>,
    /// The parameter name `afterThrowing` binds the error to.
    #[serde(default)]
    pub throwing: Option<String>,
    /// Comma-separated declared parameter names.
    #[serde(default)]
    pub arg_names: Option<String>,
}

/// One woven aspect: a module reference plus its ordered advices.
#[derive(Debug, Clone, Deserialize)]
pub struct AspectConfig {
    /// This aspect's id, used for the live-proxy set key.
    pub id: String,
    /// The module locator resolved against the `modules` map passed to
    /// `Weaver::boot` (see DESIGN.md for why "load module" is reinterpreted
    /// this way in a target without dynamic module resolution).
    #[serde(rename = "ref")]
    pub module_ref: String,
    /// Weaving order, ascending; absent treated as `0`.
    #[serde(default)]
    pub order: Option<i64>,
    /// Aspect-local named pointcuts.
    #[serde(default)]
    pub pointcuts: Option<Vec<PointcutConfig>>,
    /// The advices this aspect installs.
    pub advices: Vec<AdviceConfig>,
}

/// A class-filter matcher config: `type -> bool` by exact type name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFilterConfig {
    /// The exact type name this filter accepts.
    pub class_name: String,
}

/// A method-matcher config: matches by method name (and optionally
/// declared parameter type names).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMatcherConfig {
    /// The method name this matcher accepts.
    pub method_name: String,
    /// Declared parameter type names, if the matcher should also check arity/types.
    #[serde(default)]
    pub param_types: Option<Vec<String>>,
}

/// An advisor's selecting expression: either a class filter or a method matcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvisorExpression {
    /// A class-filter matcher.
    ClassFilter(ClassFilterConfig),
    /// A method matcher.
    MethodMatcher(MethodMatcherConfig),
}

/// One advisor: an advice paired with its own selecting expression,
/// independent of the aspect/pointcut path.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// This advisor's id.
    pub id: String,
    /// The advice it binds.
    pub advice: AdviceConfig,
    /// The module the advice method is resolved from.
    #[serde(rename = "ref")]
    pub module_ref: String,
    /// The selecting expression.
    pub expression: AdvisorExpression,
}

fn default_false() -> bool {
    false
}

/// The full boot configuration (spec.md §6 `AopConfig`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AopConfig {
    /// Named pointcuts registered globally before weaving.
    #[serde(default)]
    pub pointcuts: Option<Vec<PointcutConfig>>,
    /// Aspects to weave, ordered by `order` ascending.
    pub aspects: Vec<AspectConfig>,
    /// Advisors to weave independently of the aspect list.
    #[serde(default)]
    pub advisors: Option<Vec<AdvisorConfig>>,
    /// Whether to force the prototype-overlay ("class proxy") strategy.
    #[serde(default = "default_false")]
    pub proxy_target_class: bool,
    /// Whether to use the AspectJ-style per-access dispatch strategy.
    #[serde(default = "default_false")]
    pub use_aspect_j: bool,
    /// Whether produced `ProxyFactory`s refuse further mutation.
    #[serde(default = "default_false")]
    pub frozen: bool,
    /// Whether to publish the current proxy in the thread-local slot.
    #[serde(default = "default_false")]
    pub expose_proxy: bool,
}
