//! Literal and identifier expressions used for default values and
//! enumerator values.

use std::fmt::{self, Write};

use serde::Deserialize;

use crate::identifier::Id;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A default-value or enumerator-value expression.
///
/// In a TOML model an integer, float, boolean or string is a literal, and an
/// inline table `{ ident = "NAME" }` is an identifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Expression {
    Literal(Literal),
    Identifier { ident: Id },
}

impl Expression {
    pub fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    pub fn identifier(name: impl Into<Id>) -> Self {
        Self::Identifier { ident: name.into() }
    }

    /// Returns the integer value of an integer literal.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Literal(Literal::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Evaluates the expression to an integer.
    ///
    /// Identifiers are not folded against other declarations: they, and any
    /// non-integer literal, evaluate to the placeholder `0`.
    pub fn evaluate(&self) -> i64 {
        self.as_integer().unwrap_or(0)
    }

    /// Returns `true` if the expression is an identifier.
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier { .. })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Literal::Bool(value)) => write!(f, "{value}"),
            Self::Literal(Literal::Integer(value)) => write!(f, "{value}"),
            Self::Literal(Literal::Float(value)) => {
                if value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            Self::Literal(Literal::String(value)) => write_quoted(f, value),
            Self::Identifier { ident } => write!(f, "{ident}"),
        }
    }
}

/// Writes `value` as a C/C++ string literal. Control characters and
/// non-ASCII bytes use three-digit octal escapes, which never absorb a
/// following character.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for byte in value.bytes() {
        match byte {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x20..=0x7e => f.write_char(char::from(byte))?,
            _ => write!(f, "\\{byte:03o}")?,
        }
    }
    f.write_char('"')
}
