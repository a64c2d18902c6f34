//! The ten primitive pointcut predicates from spec.md §3.

use super::candidate::MatchContext;
use crate::error::AspectError;
use regex::Regex;

/// One atomic predicate, built from a single `name(body)` token.
#[derive(Clone)]
pub enum Primitive {
    /// `execution(pat)` — matches the candidate string
    /// `"{vis} {owner}.{method}({param_types})"` against `pat`.
    Execution(Regex),
    /// `within(pat)` — matches the owner type name against `pat`.
    Within(Regex),
    /// `this(name)` — the proxy's type name equals `name`.
    This(String),
    /// `target(name)` — the target's type name equals `name`.
    Target(String),
    /// `args(t1,…,tn)` — the actual argument tuple shape.
    Args(Vec<String>),
    /// `@target(name)` — target's (class-level) metadata has key `name`.
    AtTarget(String),
    /// `@within(name)` — target's type metadata has key `name`.
    AtWithin(String),
    /// `@annotation(name)` — the method has metadata key `name`.
    AtAnnotation(String),
    /// `@args(n1,…,nk)` — each actual has metadata key `ni`.
    AtArgs(Vec<String>),
    /// `bean(name)` — matched against the owner type's identifying name
    /// (no DI container is part of this kernel; see DESIGN.md).
    Bean(String),
}

impl Primitive {
    /// Parse a single primitive token, e.g. `execution(* svc.greet(..))`.
    pub fn parse(token: &str) -> Result<Self, AspectError> {
        let (name, body) = split_primitive(token).ok_or_else(|| AspectError::parse(token))?;
        match name {
            "execution" => Ok(Primitive::Execution(pattern_to_regex(body)?)),
            "within" => Ok(Primitive::Within(pattern_to_regex(body)?)),
            "this" => Ok(Primitive::This(body.trim().to_string())),
            "target" => Ok(Primitive::Target(body.trim().to_string())),
            "args" => Ok(Primitive::Args(split_csv(body))),
            "@target" => Ok(Primitive::AtTarget(body.trim().to_string())),
            "@within" => Ok(Primitive::AtWithin(body.trim().to_string())),
            "@annotation" => Ok(Primitive::AtAnnotation(body.trim().to_string())),
            "@args" => Ok(Primitive::AtArgs(split_csv(body))),
            "bean" => Ok(Primitive::Bean(body.trim().to_string())),
            _ => Err(AspectError::parse(token)),
        }
    }

    /// Evaluate this primitive against a candidate.
    pub fn evaluate(&self, ctx: &MatchContext) -> bool {
        match self {
            Primitive::Execution(re) => match ctx.method {
                Some(method) => re.is_match(&execution_signature(ctx.join_point.owner_type(), method)),
                None => false,
            },
            Primitive::Within(re) => re.is_match(ctx.join_point.owner_type()),
            Primitive::This(name) => ctx.proxy_type == name,
            Primitive::Target(name) => ctx.join_point.owner_type() == name,
            Primitive::Args(types) => {
                let args = ctx.join_point.args();
                args.len() == types.len()
                    && args
                        .iter()
                        .zip(types)
                        .all(|(actual, expected)| expected == "*" || actual.type_name() == expected)
            }
            Primitive::AtTarget(name) => ctx.metadata.has_class(ctx.join_point.owner_type(), name),
            Primitive::AtWithin(name) => ctx.metadata.has_class(ctx.join_point.owner_type(), name),
            Primitive::AtAnnotation(name) => match ctx.method {
                Some(method) => {
                    ctx.metadata
                        .has_method(ctx.join_point.owner_type(), &method.name, name)
                }
                None => false,
            },
            Primitive::AtArgs(names) => {
                let args = ctx.join_point.args();
                args.len() == names.len()
                    && args.iter().zip(names).all(|(actual, key)| match actual {
                        crate::value::Value::Object(obj) => {
                            ctx.metadata.has_class(obj.type_name(), key)
                        }
                        _ => false,
                    })
            }
            Primitive::Bean(name) => ctx.join_point.owner_type() == name,
        }
    }
}

/// The canonical "function's string form" `execution` matches against.
/// Documented as an explicit resolution of spec.md's underspecified
/// "function's string form" wording (DESIGN.md).
fn execution_signature(owner_type: &str, method: &super::candidate::MethodInfo) -> String {
    let vis = if method.public { "pub" } else { "" };
    format!(
        "{vis} {owner_type}.{}({})",
        method.name,
        method.param_types.join(", ")
    )
}

/// Split `name(body)` into its parts. The body may itself contain
/// balanced parentheses (e.g. `execution(* svc.greet(..))`), so this
/// looks for the matching close paren rather than the first one.
fn split_primitive(token: &str) -> Option<(&str, &str)> {
    let open = token.find('(')?;
    if !token.ends_with(')') {
        return None;
    }
    let name = &token[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '@' || c == '_') {
        return None;
    }
    let body = &token[open + 1..token.len() - 1];
    Some((name, body))
}

fn split_csv(body: &str) -> Vec<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(',').map(|s| s.trim().to_string()).collect()
}

/// Convert a pattern using `*` ≡ `.*` and `..` ≡ `.*` into an anchored
/// regex. Escapes the literal text first, then re-expands the two
/// wildcard tokens, so any other regex metacharacter in the pattern is
/// matched literally.
pub fn pattern_to_regex(pattern: &str) -> Result<Regex, AspectError> {
    let escaped = regex::escape(pattern);
    let expanded = escaped.replace(r"\.\.", ".*").replace(r"\*", ".*");
    Regex::new(&format!("^{expanded}$"))
        .map_err(|e| AspectError::parse(format!("{pattern} ({e})")))
}
