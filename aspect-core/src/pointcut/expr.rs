//! Pointcut expression parsing and evaluation (C3).
//!
//! Per spec.md §4.3, an expression is built from whitespace-separated
//! tokens combined by the infix operators `&&`/`||` and the prefix
//! operator `!`, evaluated left-to-right with equal precedence — no
//! parentheses grammar, no precedence differentiation between `&&` and
//! `||`. Predicates and operators are pushed onto a stack, which is
//! collapsed left-to-right by popping two operands and an operator
//! whenever two operands are available (spec.md §4.3, Open Question #2:
//! mixed `&&`/`||` expressions are therefore undefined beyond this
//! left-to-right collapse, and are accepted rather than rejected since the
//! collapse itself is total over any token stream the tokenizer emits).

use super::candidate::MatchContext;
use super::primitive::Primitive;
use super::registry::PointcutRegistry;
use crate::error::AspectError;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&MatchContext) -> bool + Send + Sync>;

/// A parsed, closed pointcut predicate: `(candidate) -> bool`.
///
/// Evaluation is side-effect free and deterministic: `parse(e)` always
/// produces a predicate whose result depends only on its candidate
/// (spec.md §8, invariant 2).
#[derive(Clone)]
pub struct PointcutExpression {
    text: String,
    predicate: Predicate,
}

impl std::fmt::Debug for PointcutExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointcutExpression")
            .field("text", &self.text)
            .finish()
    }
}

impl PointcutExpression {
    /// Parse a pointcut expression, resolving bare identifiers against
    /// `registry`. Unknown tokens are a fatal parse error.
    pub fn parse(input: &str, registry: &PointcutRegistry) -> Result<Self, AspectError> {
        let predicate = parse_to_predicate(input, registry)?;
        Ok(Self {
            text: input.to_string(),
            predicate,
        })
    }

    /// The original source text (used by C8's exact pointcut-text match).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Evaluate this expression against a candidate.
    pub fn evaluate(&self, ctx: &MatchContext) -> bool {
        (self.predicate)(ctx)
    }
}

#[derive(Clone)]
enum StackItem {
    Operand(Predicate),
    And,
    Or,
}

/// Depth-aware whitespace tokenizer: splits on whitespace except inside
/// a primitive's parenthesized body, so `execution(* svc.greet(..))`
/// remains one token even though it contains a space (see SPEC_FULL.md
/// §4.3 for why this reading is necessary).
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in input.trim().chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_to_predicate(input: &str, registry: &PointcutRegistry) -> Result<Predicate, AspectError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(AspectError::parse(input));
    }

    let mut stack: Vec<StackItem> = Vec::new();
    let mut pending_not = false;

    for token in &tokens {
        match token.as_str() {
            "&&" => stack.push(StackItem::And),
            "||" => stack.push(StackItem::Or),
            "!" => pending_not = true,
            _ => {
                let mut predicate = resolve_operand(token, registry)?;
                if pending_not {
                    predicate = negate(predicate);
                    pending_not = false;
                }
                stack.push(StackItem::Operand(predicate));
                collapse(&mut stack);
            }
        }
    }

    match stack.len() {
        1 => match stack.pop().unwrap() {
            StackItem::Operand(p) => Ok(p),
            _ => Err(AspectError::parse(input)),
        },
        _ => Err(AspectError::parse(input)),
    }
}

/// Collapse the stack left-to-right: whenever two operands are
/// available with an operator between them, pop all three and push the
/// combined operand back.
fn collapse(stack: &mut Vec<StackItem>) {
    while stack.len() >= 3 {
        let len = stack.len();
        let ready = matches!(stack[len - 3], StackItem::Operand(_))
            && matches!(stack[len - 1], StackItem::Operand(_));
        if !ready {
            return;
        }
        let right = match stack.pop().unwrap() {
            StackItem::Operand(p) => p,
            _ => unreachable!(),
        };
        let op = stack.pop().unwrap();
        let left = match stack.pop().unwrap() {
            StackItem::Operand(p) => p,
            _ => unreachable!(),
        };
        let combined: Predicate = match op {
            StackItem::And => Arc::new(move |ctx: &MatchContext| left(ctx) && right(ctx)),
            StackItem::Or => Arc::new(move |ctx: &MatchContext| left(ctx) || right(ctx)),
            StackItem::Operand(_) => unreachable!("checked above"),
        };
        stack.push(StackItem::Operand(combined));
    }
}

fn negate(predicate: Predicate) -> Predicate {
    Arc::new(move |ctx: &MatchContext| !predicate(ctx))
}

fn resolve_operand(token: &str, registry: &PointcutRegistry) -> Result<Predicate, AspectError> {
    if token.contains('(') {
        let primitive = Primitive::parse(token)?;
        Ok(Arc::new(move |ctx: &MatchContext| primitive.evaluate(ctx)))
    } else if is_bare_identifier(token) {
        registry
            .get(token)
            .map(|expr| {
                let expr = expr.clone();
                Arc::new(move |ctx: &MatchContext| expr.evaluate(ctx)) as Predicate
            })
            .ok_or_else(|| AspectError::reference(format!("unknown named pointcut `{token}`")))
    } else {
        Err(AspectError::parse(token.to_string()))
    }
}

fn is_bare_identifier(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
        && token.chars().all(|c| c.is_alphanumeric() || c == '_')
}
