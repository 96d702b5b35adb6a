//! Primitive type groups.
//!
//! Primitive types are the leaves of the type system. They are never
//! inherited from and never participate in cycle checks.

use serde::Deserialize;

use crate::identifier::Id;

/// A named group of primitive types.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveTypeDef {
    pub name: Id,
    #[serde(default)]
    pub data_types: Vec<BasicTypeId>,
}

impl PrimitiveTypeDef {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            data_types: Vec::new(),
        }
    }

    /// Adds a primitive type to the group.
    pub fn with(mut self, basic: BasicTypeId) -> Self {
        self.data_types.push(basic);
        self
    }
}

/// Broad category of a primitive type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Numeric or boolean value.
    #[default]
    Value,
    /// Text.
    String,
}

/// Encoding of a primitive value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    None,
    #[serde(rename = "ieee754", alias = "IEEE754")]
    Ieee754,
    Signed,
    Unsigned,
    Utf8,
}

/// Shape of a primitive type as seen by the code generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Integer { bits: u32, signed: bool },
    Float { bits: u32 },
    Text,
}

/// Integer width assumed when a value type declares no bit length.
pub const DEFAULT_INTEGER_BITS: u32 = 32;

/// A single primitive type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicTypeId {
    pub name: Id,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub bit_length: Option<u32>,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default)]
    pub line: Option<u32>,
}

impl BasicTypeId {
    /// A value type of the given width.
    pub fn value(name: impl Into<Id>, bits: u32) -> Self {
        Self {
            name: name.into(),
            category: Category::Value,
            bit_length: Some(bits),
            encoding: Encoding::None,
            line: None,
        }
    }

    /// An IEEE754 floating point type of the given width.
    pub fn float(name: impl Into<Id>, bits: u32) -> Self {
        Self {
            encoding: Encoding::Ieee754,
            ..Self::value(name, bits)
        }
    }

    /// A string type.
    pub fn string(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            category: Category::String,
            bit_length: None,
            encoding: Encoding::None,
            line: None,
        }
    }

    /// Sets the encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Classifies the primitive for code generation.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeforge_core::model::{BasicTypeId, PrimitiveKind};
    ///
    /// assert_eq!(
    ///     BasicTypeId::value("uint32", 32).kind(),
    ///     PrimitiveKind::Integer { bits: 32, signed: false }
    /// );
    /// assert_eq!(BasicTypeId::float("double", 64).kind(), PrimitiveKind::Float { bits: 64 });
    /// assert_eq!(BasicTypeId::value("bool", 8).kind(), PrimitiveKind::Boolean);
    /// ```
    pub fn kind(&self) -> PrimitiveKind {
        if self.category == Category::String {
            return PrimitiveKind::Text;
        }
        if self.encoding == Encoding::Ieee754 {
            return PrimitiveKind::Float {
                bits: self.bit_length.unwrap_or(64),
            };
        }
        let is_boolean_name = self
            .name
            .with_str(|name| name.eq_ignore_ascii_case("bool") || name.eq_ignore_ascii_case("boolean"));
        if is_boolean_name || self.bit_length == Some(1) {
            return PrimitiveKind::Boolean;
        }
        let signed = match self.encoding {
            Encoding::Unsigned => false,
            Encoding::Signed => true,
            _ => !self.name.with_str(|name| name.starts_with('u') || name.starts_with('U')),
        };
        PrimitiveKind::Integer {
            bits: self.bit_length.unwrap_or(DEFAULT_INTEGER_BITS),
            signed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_text() {
        assert_eq!(BasicTypeId::string("string").kind(), PrimitiveKind::Text);
    }

    #[test]
    fn test_kind_integer_sign_from_name() {
        assert_eq!(
            BasicTypeId::value("int64", 64).kind(),
            PrimitiveKind::Integer {
                bits: 64,
                signed: true
            }
        );
        assert_eq!(
            BasicTypeId::value("uint16", 16).kind(),
            PrimitiveKind::Integer {
                bits: 16,
                signed: false
            }
        );
    }

    #[test]
    fn test_kind_integer_sign_from_encoding() {
        let unsigned = BasicTypeId::value("word", 16).with_encoding(Encoding::Unsigned);
        assert_eq!(
            unsigned.kind(),
            PrimitiveKind::Integer {
                bits: 16,
                signed: false
            }
        );

        let signed = BasicTypeId::value("ucount", 16).with_encoding(Encoding::Signed);
        assert_eq!(
            signed.kind(),
            PrimitiveKind::Integer {
                bits: 16,
                signed: true
            }
        );
    }

    #[test]
    fn test_kind_boolean() {
        assert_eq!(BasicTypeId::value("flag", 1).kind(), PrimitiveKind::Boolean);
        assert_eq!(BasicTypeId::value("Boolean", 8).kind(), PrimitiveKind::Boolean);
    }

    #[test]
    fn test_kind_default_width() {
        let mut basic = BasicTypeId::value("int", 32);
        basic.bit_length = None;
        assert_eq!(
            basic.kind(),
            PrimitiveKind::Integer {
                bits: DEFAULT_INTEGER_BITS,
                signed: true
            }
        );
    }

    #[test]
    fn test_kind_float() {
        assert_eq!(BasicTypeId::float("float", 32).kind(), PrimitiveKind::Float { bits: 32 });
    }
}
