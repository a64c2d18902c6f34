//! Error types for the advice/pointcut/weaver kernel.

use std::error::Error;
use std::fmt;

/// Errors the kernel can raise, per the error kinds in spec.md §7.
///
/// Never recovered silently: surfaced to the caller of the intercepted
/// method, the caller of `Weaver::boot`, or the caller of whichever
/// decorator installed the advice.
#[derive(Debug)]
pub enum AspectError {
    /// An unknown or malformed token in a pointcut expression. Raised at
    /// parse time, never swallowed.
    Parse(String),

    /// An unknown pointcut reference, a missing target method, or a
    /// missing aspect module, discovered while weaving.
    Reference(String),

    /// A mutation was attempted against a frozen `ProxyFactory`.
    PolicyViolation(String),

    /// Parameter names could not be resolved by any
    /// `ParameterNameDiscoverer`.
    Discovery(String),

    /// An exception raised inside an advice body, re-propagated to the
    /// caller of the intercepted method.
    Advice(Box<dyn Error + Send + Sync>),
}

impl AspectError {
    /// Build a [`AspectError::Parse`] naming the offending token.
    pub fn parse(token: impl Into<String>) -> Self {
        Self::Parse(token.into())
    }

    /// Build a [`AspectError::Reference`] naming the missing id.
    pub fn reference(message: impl Into<String>) -> Self {
        Self::Reference(message.into())
    }

    /// Build a [`AspectError::PolicyViolation`].
    pub fn policy_violation(message: impl Into<String>) -> Self {
        Self::PolicyViolation(message.into())
    }

    /// Build a [`AspectError::Discovery`] error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery(message.into())
    }

    /// Wrap an arbitrary advice-body error.
    pub fn advice(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Advice(Box::new(error))
    }
}

impl fmt::Display for AspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(token) => write!(f, "pointcut parse error: unknown token `{token}`"),
            Self::Reference(message) => write!(f, "reference error: {message}"),
            Self::PolicyViolation(message) => write!(f, "policy violation: {message}"),
            Self::Discovery(message) => write!(f, "parameter discovery error: {message}"),
            Self::Advice(err) => write!(f, "advice error: {err}"),
        }
    }
}

impl Error for AspectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Advice(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<String> for AspectError {
    fn from(s: String) -> Self {
        Self::Advice(s.into())
    }
}

impl From<&str> for AspectError {
    fn from(s: &str) -> Self {
        Self::Advice(s.to_string().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_token() {
        let err = AspectError::parse("fooBar(x)");
        assert_eq!(
            err.to_string(),
            "pointcut parse error: unknown token `fooBar(x)`"
        );
    }

    #[test]
    fn reference_error_round_trips() {
        let err = AspectError::reference("missing pointcut `auditable`");
        assert!(matches!(err, AspectError::Reference(_)));
    }

    #[test]
    fn advice_error_has_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = AspectError::advice(inner);
        assert!(err.source().is_some());
    }
}
