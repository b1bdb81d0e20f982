//! Argument coercion: raw tokens into typed values.

use super::{ParamKind, ParameterSpec};
use thiserror::Error;

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Coercion failure: the token did not parse as the declared kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid argument format '{token}' for {parameter}")]
pub struct CoerceError {
    pub token: String,
    pub parameter: &'static str,
}

/// Convert one raw token per the parameter's declared kind.
///
/// `Text` takes the token verbatim and cannot fail. `Int` accepts base-10
/// signed integers; garbage, empty tokens, and overflow all report the same
/// [`CoerceError`].
pub fn coerce(token: &str, spec: &ParameterSpec) -> Result<Value, CoerceError> {
    match spec.kind {
        ParamKind::Text => Ok(Value::Text(token.to_string())),
        ParamKind::Int => token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CoerceError {
                token: token.to_string(),
                parameter: spec.name,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT_SPEC: ParameterSpec = ParameterSpec {
        name: "name",
        kind: ParamKind::Text,
    };
    const INT_SPEC: ParameterSpec = ParameterSpec {
        name: "number_of_teams",
        kind: ParamKind::Int,
    };

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            coerce("anything at all", &TEXT_SPEC).unwrap(),
            Value::Text("anything at all".to_string())
        );
    }

    #[test]
    fn test_int_round_trip() {
        assert_eq!(coerce("42", &INT_SPEC).unwrap(), Value::Int(42));
        assert_eq!(coerce("-7", &INT_SPEC).unwrap(), Value::Int(-7));
    }

    #[test]
    fn test_int_rejects_garbage() {
        for token in ["abc", "4x", "", "2 3", "1.5"] {
            let err = coerce(token, &INT_SPEC).unwrap_err();
            assert_eq!(err.token, token);
            assert_eq!(err.parameter, "number_of_teams");
        }
    }

    #[test]
    fn test_int_rejects_overflow() {
        assert!(coerce("99999999999999999999", &INT_SPEC).is_err());
    }
}
