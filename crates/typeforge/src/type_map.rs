//! Type mapping shared by the C++ and Protobuf generators.
//!
//! Both generators dereference a resolved [`TypeRef`] through [`target`] and
//! map primitives by their [`PrimitiveKind`].
//!
//! | Primitive             | C++             | Protobuf |
//! |-----------------------|-----------------|----------|
//! | boolean               | `bool`          | `bool`   |
//! | integer, <= 32 bits   | `(u)intN_t`     | `int32`  |
//! | integer, > 32 bits    | `(u)int64_t`    | `int64`  |
//! | float, 32 bits        | `float`         | `float`  |
//! | float, other widths   | `double`        | `double` |
//! | string category       | `std::string`   | `string` |

use typeforge_core::{
    identifier::Id,
    model::{BasicTypeId, Binding, Enumerator, Model, PrimitiveKind, TypeDef, TypeEntry, TypeRef},
};

use crate::error::GenerationError;

/// Alias chains longer than this are treated as cyclic.
pub const MAX_ALIAS_DEPTH: usize = 16;

/// The declaration a resolved reference points to.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Basic(&'a BasicTypeId),
    Declared(TypeEntry<'a>),
}

/// Dereferences a resolved type reference.
///
/// # Errors
///
/// Returns [`GenerationError::UnresolvedReference`] for pending or
/// unresolved bindings and [`GenerationError::DanglingHandle`] for handles
/// that do not point into `model`.
pub fn target<'a>(model: &'a Model, type_ref: &TypeRef) -> Result<Target<'a>, GenerationError> {
    match type_ref.binding {
        Binding::Basic(id) => model
            .basic_type(id)
            .map(Target::Basic)
            .ok_or_else(|| GenerationError::DanglingHandle {
                name: type_ref.name,
                handle: format!("{}:{}", id.group, id.index),
            }),
        Binding::Type(id) => {
            model
                .entry(id)
                .map(Target::Declared)
                .ok_or_else(|| GenerationError::DanglingHandle {
                    name: type_ref.name,
                    handle: id.to_string(),
                })
        }
        Binding::Pending | Binding::Unresolved => Err(GenerationError::UnresolvedReference {
            name: type_ref.name,
        }),
    }
}

/// Returns `true` if values of the referenced type are cheap to copy:
/// booleans, numbers, enumerations, and aliases of those.
pub fn is_scalar(model: &Model, type_ref: &TypeRef) -> Result<bool, GenerationError> {
    let mut current = type_ref;
    for _ in 0..MAX_ALIAS_DEPTH {
        match target(model, current)? {
            Target::Basic(basic) => return Ok(basic.kind() != PrimitiveKind::Text),
            Target::Declared(entry) => match entry.type_def {
                TypeDef::Enumeration(_) => return Ok(true),
                TypeDef::Alias(alias) => match &alias.actual_type {
                    Some(actual) => current = actual,
                    None => return Err(unresolved(alias.name)),
                },
                TypeDef::Struct(_) | TypeDef::Array(_) => return Ok(false),
            },
        }
    }
    Err(unresolved(type_ref.name))
}

/// C++ spelling of a primitive.
pub fn cpp_primitive(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Text => "std::string",
        PrimitiveKind::Float { bits: 32 } => "float",
        PrimitiveKind::Float { .. } => "double",
        PrimitiveKind::Integer { bits, signed } => match (bits, signed) {
            (0..=8, true) => "int8_t",
            (0..=8, false) => "uint8_t",
            (9..=16, true) => "int16_t",
            (9..=16, false) => "uint16_t",
            (17..=32, true) => "int32_t",
            (17..=32, false) => "uint32_t",
            (_, true) => "int64_t",
            (_, false) => "uint64_t",
        },
    }
}

/// Protobuf scalar type of a primitive.
pub fn proto_scalar(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Text => "string",
        PrimitiveKind::Float { bits: 32 } => "float",
        PrimitiveKind::Float { .. } => "double",
        PrimitiveKind::Integer { bits, .. } if bits <= 32 => "int32",
        PrimitiveKind::Integer { .. } => "int64",
    }
}

/// Enumerators of an enumeration with those of its base chain folded in,
/// farthest base first, paired with their effective values.
///
/// Implicit values continue across the fold: the first enumerator of a
/// derived enumeration follows the last one of its base.
pub fn folded_enumerators(model: &Model, entry: TypeEntry<'_>) -> Vec<(Id, i64)> {
    let Some(enumeration) = entry.type_def.as_enumeration() else {
        return Vec::new();
    };

    let mut enumerators: Vec<&Enumerator> = Vec::new();
    for base in model.base_chain(entry.id).into_iter().rev() {
        if let Some(base) = model.type_def(base).and_then(TypeDef::as_enumeration) {
            enumerators.extend(&base.enumerators);
        }
    }
    enumerators.extend(&enumeration.enumerators);

    let mut next = 0i64;
    enumerators
        .into_iter()
        .map(|enumerator| {
            let value = enumerator
                .value
                .as_ref()
                .map(|value| value.evaluate())
                .unwrap_or(next);
            next = value.saturating_add(1);
            (enumerator.name, value)
        })
        .collect()
}

fn unresolved(name: Id) -> GenerationError {
    GenerationError::UnresolvedReference { name }
}
