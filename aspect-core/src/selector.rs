//! CSS-selector-shaped matching (C4).
//!
//! spec.md §4.4 borrows CSS selector syntax to let a pointcut pick
//! candidates by id, type, wildcard or attribute, independently of the
//! `execution`/`within` regex primitives. A [`SelectorMatcher`] is built
//! once from a selector string and then applied to any number of
//! candidates via [`SelectorMatcher::matches`].

use crate::metadata::MetadataStore;
use crate::value::Value;

/// One parsed selector form.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    /// `*` — matches every candidate.
    Wildcard,
    /// `#id` — matches a candidate whose `id` metadata equals the name.
    Id(String),
    /// `TypeName` — matches a candidate's owner type exactly.
    Type(String),
    /// `[attr]`, `[attr=value]`, `[attr~=value]`, `[attr|=value]`,
    /// `[attr^=value]`, `[attr$=value]`, `[attr*=value]`.
    Attribute {
        name: String,
        op: Option<AttrOp>,
        value: Option<String>,
    },
}

/// Attribute comparison operators, spec.md §4.4's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

/// HTML reserves a handful of attribute names as always case-insensitive
/// regardless of the operator used; this kernel applies the same table so
/// callers migrating selectors don't get a surprise (spec.md §4.4 note).
const CASE_INSENSITIVE_ATTRS: &[&str] = &["id", "class", "type", "name"];

/// A compiled selector, ready to test candidates against.
pub struct SelectorMatcher {
    selectors: Vec<Selector>,
}

impl SelectorMatcher {
    /// Parse a comma-separated selector list (any item matching is a hit).
    pub fn parse(text: &str) -> Self {
        let selectors = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_one)
            .collect();
        Self { selectors }
    }

    /// Whether `owner_type` (optionally via `metadata`) matches any of
    /// this matcher's selector alternatives. Short-circuits to `true` for
    /// a bare `*` selector (spec.md §8 invariant 7).
    pub fn matches(&self, owner_type: &str, metadata: &MetadataStore) -> bool {
        self.selectors
            .iter()
            .any(|s| selector_matches(s, owner_type, metadata))
    }

    /// `filter(type) -> bool`, the class-filter entry point spec.md §4.4
    /// names separately from `matches` even though this kernel's
    /// collapsed selector model evaluates both the same way.
    pub fn filter(&self, owner_type: &str, metadata: &MetadataStore) -> bool {
        self.matches(owner_type, metadata)
    }

    /// Filter a slice of candidate type names down to the ones this
    /// matcher accepts, preserving order.
    pub fn filter_candidates<'a>(&self, candidates: &[&'a str], metadata: &MetadataStore) -> Vec<&'a str> {
        candidates
            .iter()
            .copied()
            .filter(|c| self.matches(c, metadata))
            .collect()
    }

    /// Match an actual argument list's type names against declared
    /// parameter type selectors (spec.md §4.4, used by `args(..)`-style
    /// checks that go through selector syntax rather than a bare CSV).
    pub fn match_arguments(&self, args: &[Value], metadata: &MetadataStore) -> bool {
        if self.selectors.len() != args.len() {
            return false;
        }
        self.selectors
            .iter()
            .zip(args)
            .all(|(selector, arg)| selector_matches(selector, arg.type_name(), metadata))
    }
}

fn parse_one(token: &str) -> Selector {
    if token == "*" {
        return Selector::Wildcard;
    }
    if let Some(id) = token.strip_prefix('#') {
        return Selector::Id(id.to_string());
    }
    if token.starts_with('[') && token.ends_with(']') {
        return parse_attribute(&token[1..token.len() - 1]);
    }
    Selector::Type(token.to_string())
}

fn parse_attribute(body: &str) -> Selector {
    const OPS: &[(&str, AttrOp)] = &[
        ("~=", AttrOp::Includes),
        ("|=", AttrOp::DashMatch),
        ("^=", AttrOp::Prefix),
        ("$=", AttrOp::Suffix),
        ("*=", AttrOp::Substring),
        ("=", AttrOp::Equals),
    ];
    for (token, op) in OPS {
        if let Some(idx) = body.find(token) {
            let name = body[..idx].trim().to_string();
            let value = body[idx + token.len()..].trim().trim_matches('"').to_string();
            return Selector::Attribute {
                name,
                op: Some(*op),
                value: Some(value),
            };
        }
    }
    Selector::Attribute {
        name: body.trim().to_string(),
        op: None,
        value: None,
    }
}

fn selector_matches(selector: &Selector, owner_type: &str, metadata: &MetadataStore) -> bool {
    match selector {
        Selector::Wildcard => true,
        Selector::Type(name) => name == owner_type,
        Selector::Id(id) => metadata
            .get_class(owner_type, "id")
            .and_then(|v| v.as_str().map(str::to_string))
            .is_some_and(|actual| &actual == id),
        Selector::Attribute { name, op, value } => match (op, value) {
            (None, None) => metadata.has_class(owner_type, name),
            (Some(op), Some(expected)) => metadata
                .get_class(owner_type, name)
                .and_then(|v| v.as_str().map(str::to_string))
                .is_some_and(|actual| attr_op_matches(*op, name, &actual, expected)),
            _ => false,
        },
    }
}

fn attr_op_matches(op: AttrOp, attr_name: &str, actual: &str, expected: &str) -> bool {
    let case_insensitive = CASE_INSENSITIVE_ATTRS.contains(&attr_name);
    let (actual, expected) = if case_insensitive {
        (actual.to_lowercase(), expected.to_lowercase())
    } else {
        (actual.to_string(), expected.to_string())
    };
    match op {
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => actual.split_whitespace().any(|w| w == expected),
        AttrOp::DashMatch => actual == expected || actual.starts_with(&format!("{expected}-")),
        AttrOp::Prefix => actual.starts_with(&expected),
        AttrOp::Suffix => actual.ends_with(&expected),
        AttrOp::Substring => actual.contains(&expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matches_everything() {
        let matcher = SelectorMatcher::parse("*");
        let metadata = MetadataStore::new();
        assert!(matcher.matches("svc::Greeter", &metadata));
        assert!(matcher.filter("anything::Else", &metadata));
    }

    #[test]
    fn type_selector_matches_exact_name() {
        let matcher = SelectorMatcher::parse("svc::Greeter");
        let metadata = MetadataStore::new();
        assert!(matcher.matches("svc::Greeter", &metadata));
        assert!(!matcher.matches("svc::Other", &metadata));
    }

    #[test]
    fn id_selector_reads_class_metadata() {
        let matcher = SelectorMatcher::parse("#greeter");
        let metadata = MetadataStore::new();
        metadata.set_class("svc::Greeter", "id", Value::str("greeter"));
        assert!(matcher.matches("svc::Greeter", &metadata));
    }

    #[test]
    fn attribute_prefix_operator() {
        let matcher = SelectorMatcher::parse("[namespace^=svc]");
        let metadata = MetadataStore::new();
        metadata.set_class("svc::Greeter", "namespace", Value::str("svc::inner"));
        assert!(matcher.matches("svc::Greeter", &metadata));
    }

    #[test]
    fn attribute_presence_without_operator() {
        let matcher = SelectorMatcher::parse("[aspect]");
        let metadata = MetadataStore::new();
        metadata.set_class("svc::Greeter", "aspect", Value::Bool(true));
        assert!(matcher.matches("svc::Greeter", &metadata));
        assert!(!matcher.matches("svc::Other", &metadata));
    }

    #[test]
    fn comma_separated_alternatives() {
        let matcher = SelectorMatcher::parse("svc::A, svc::B");
        let metadata = MetadataStore::new();
        assert!(matcher.matches("svc::B", &metadata));
        assert!(!matcher.matches("svc::C", &metadata));
    }

    #[test]
    fn filter_preserves_order() {
        let matcher = SelectorMatcher::parse("svc::A, svc::C");
        let metadata = MetadataStore::new();
        let result = matcher.filter_candidates(&["svc::A", "svc::B", "svc::C"], &metadata);
        assert_eq!(result, vec!["svc::A", "svc::C"]);
    }
}
