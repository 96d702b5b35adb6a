//! Error codes for the Typeforge diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Scope resolution
//! - `E2xx` - Model invariants
//! - `E3xx` - Style and representation hints

use std::fmt;

/// Stable codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Resolution (E1xx)
    // =========================================================================
    /// Undefined type reference.
    ///
    /// A type name used in a field, base, element, alias, key, return or
    /// parameter position matches no primitive or declared type.
    E100,

    /// Ambiguous type reference.
    ///
    /// A simple name is declared in more than one package. The first
    /// declaration is bound; qualify the name to pick another one.
    E101,

    /// Invalid base type.
    ///
    /// A `base` names a declaration of the wrong kind (a struct may only
    /// extend a struct, an enumeration only an enumeration) or the
    /// declaration itself.
    E102,

    // =========================================================================
    // Model invariants (E2xx)
    // =========================================================================
    /// Duplicate type name within one scope.
    E200,

    /// Duplicate primitive type name within one primitive group.
    E201,

    /// Duplicate field name, counting fields inherited from `base`.
    E202,

    /// Circular struct inheritance.
    E203,

    /// Circular enumeration inheritance.
    E204,

    /// Duplicate enumerator name.
    E205,

    /// Duplicate explicit enumerator value.
    E206,

    /// No enumerator with effective value zero.
    E207,

    /// Array size is zero or negative.
    E208,

    /// Array size above 10,000 elements.
    E209,

    /// Explicit bit length outside `1..=64`.
    E210,

    /// Explicit bit length on a struct or enumeration reference.
    E211,

    /// Named array without an element type.
    E212,

    /// Type alias without an actual type.
    E213,

    /// Enumerator value outside `0..=65535`.
    E214,

    /// Conflicting method modifiers.
    ///
    /// A `static` method cannot also be `virtual`, `const`, `override` or
    /// pure virtual.
    E215,

    /// `override` on a method of a struct without a base.
    E216,

    /// Empty package name.
    E217,

    /// Circular type definition.
    ///
    /// An alias or named array expands, directly or through other aliases
    /// and arrays, back to itself.
    E218,

    /// Invalid map key type.
    ///
    /// A map key must be an integer, boolean or string primitive, possibly
    /// through an alias.
    E219,

    // =========================================================================
    // Style (E3xx)
    // =========================================================================
    /// Field name is not lower camel case.
    E300,

    /// Type name is not upper camel case.
    E301,

    /// Package name is not lowercase dotted.
    E302,

    /// Enumerator name is not upper case.
    E303,

    /// Name longer than 100 characters.
    E304,

    /// Primitive type length above 1024 bits.
    E305,

    /// Length on a string primitive type.
    E306,

    /// IEEE754 primitive type with a length other than 32 or 64.
    E307,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Resolution
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Model invariants
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E208 => "E208",
            ErrorCode::E209 => "E209",
            ErrorCode::E210 => "E210",
            ErrorCode::E211 => "E211",
            ErrorCode::E212 => "E212",
            ErrorCode::E213 => "E213",
            ErrorCode::E214 => "E214",
            ErrorCode::E215 => "E215",
            ErrorCode::E216 => "E216",
            ErrorCode::E217 => "E217",
            ErrorCode::E218 => "E218",
            ErrorCode::E219 => "E219",
            // Style
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E305 => "E305",
            ErrorCode::E306 => "E306",
            ErrorCode::E307 => "E307",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Resolution
            ErrorCode::E100 => "undefined type",
            ErrorCode::E101 => "ambiguous type reference",
            ErrorCode::E102 => "invalid base type",
            // Model invariants
            ErrorCode::E200 => "duplicate type name",
            ErrorCode::E201 => "duplicate primitive type name",
            ErrorCode::E202 => "duplicate field name",
            ErrorCode::E203 => "circular struct inheritance",
            ErrorCode::E204 => "circular enumeration inheritance",
            ErrorCode::E205 => "duplicate enumerator name",
            ErrorCode::E206 => "duplicate enumerator value",
            ErrorCode::E207 => "missing zero enumerator",
            ErrorCode::E208 => "invalid array size",
            ErrorCode::E209 => "large array size",
            ErrorCode::E210 => "invalid bit length",
            ErrorCode::E211 => "bit length on non-primitive type",
            ErrorCode::E212 => "missing element type",
            ErrorCode::E213 => "missing actual type",
            ErrorCode::E214 => "enumerator value out of range",
            ErrorCode::E215 => "conflicting method modifiers",
            ErrorCode::E216 => "override without base",
            ErrorCode::E217 => "empty package name",
            ErrorCode::E218 => "circular type definition",
            ErrorCode::E219 => "invalid map key type",
            // Style
            ErrorCode::E300 => "field naming convention",
            ErrorCode::E301 => "type naming convention",
            ErrorCode::E302 => "package naming convention",
            ErrorCode::E303 => "enumerator naming convention",
            ErrorCode::E304 => "name too long",
            ErrorCode::E305 => "large primitive length",
            ErrorCode::E306 => "string length",
            ErrorCode::E307 => "unusual floating point length",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
