//! Ordered regex-sequence matching (C5).
//!
//! spec.md §4.5 describes a matcher built from an ordered list of regular
//! expressions, one per declared parameter, optionally checked against
//! argument *names* (not just types) when the caller supplies them. A
//! literal `*` entry matches anything, bypassing the regex engine
//! entirely — spec.md is explicit that this is a fast path, not merely a
//! pattern that happens to compile to `.*`.

use crate::error::AspectError;
use regex::Regex;

#[derive(Debug)]
enum Slot {
    Any,
    Pattern(Regex),
}

/// An ordered sequence of per-argument patterns.
#[derive(Debug)]
pub struct RegexpMatcher {
    slots: Vec<Slot>,
}

impl RegexpMatcher {
    /// Compile one matcher per comma-separated pattern in `spec`.
    pub fn parse(spec: &str) -> Result<Self, AspectError> {
        let slots = spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|pattern| {
                if pattern == "*" {
                    Ok(Slot::Any)
                } else {
                    Regex::new(pattern)
                        .map(Slot::Pattern)
                        .map_err(|e| AspectError::parse(format!("{pattern} ({e})")))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    /// Number of declared slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether this matcher declares no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Match an ordered list of candidate strings (typically argument
    /// type names) positionally against this matcher's slots. Arity
    /// mismatch is always a non-match, never an error.
    pub fn matches(&self, candidates: &[&str]) -> bool {
        self.slots.len() == candidates.len()
            && self
                .slots
                .iter()
                .zip(candidates)
                .all(|(slot, candidate)| slot_matches(slot, candidate))
    }

    /// Match against declared parameter *names* rather than types, used
    /// when the caller has supplied argument names via [`super::paramnames`]
    /// (spec.md §4.5: "if names are supplied, check them too").
    pub fn matches_names(&self, names: &[String]) -> bool {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        self.matches(&refs)
    }
}

fn slot_matches(slot: &Slot, candidate: &str) -> bool {
    match slot {
        Slot::Any => true,
        Slot::Pattern(re) => re.is_match(candidate),
    }
}
