//! Schema text: messages, enums and package wrappers.

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use typeforge_core::model::{Field, Model, StructType, TypeDef, TypeEntry};

use crate::{
    error::GenerationError,
    text::{BANNER, CodeWriter},
    type_map,
};

use super::{INDENT, ProtoGenerator, enumerator_name, unspecified_name, wrapper_name};

pub(super) fn schema(generator: &ProtoGenerator<'_>) -> Result<String, GenerationError> {
    let model = generator.model();

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line("syntax = \"proto3\";");
    if let Some(package) = generator.file_package() {
        out.blank();
        out.line(format!("package {package};"));
    }

    let wraps = generator.wraps_packages();
    for entry in model.declared_types() {
        if wraps && entry.package.is_some() {
            continue;
        }
        if is_declared(entry.type_def) {
            out.blank();
            declaration(generator, &mut out, entry)?;
        }
    }

    if wraps {
        for (index, package) in model.packages.iter().enumerate() {
            let entries: Vec<TypeEntry<'_>> = model
                .declared_types()
                .filter(|entry| entry.id.package == Some(index as u32))
                .filter(|entry| is_declared(entry.type_def))
                .collect();
            trace!(package:% = package.name, declarations = entries.len(); "Writing package wrapper");

            out.blank();
            out.line(format!("// Package {}", package.name));
            out.line(format!("message {} {{", wrapper_name(package.name)));
            out.try_indented(|out| {
                for (position, entry) in entries.iter().enumerate() {
                    if position > 0 {
                        out.blank();
                    }
                    declaration(generator, out, *entry)?;
                }
                Ok(())
            })?;
            out.line("}");
        }
    }

    Ok(out.finish())
}

/// Structs and enumerations get a declaration; arrays and aliases are
/// expanded where they are referenced.
pub(super) fn is_declared(type_def: &TypeDef) -> bool {
    matches!(type_def, TypeDef::Struct(_) | TypeDef::Enumeration(_))
}

fn declaration(
    generator: &ProtoGenerator<'_>,
    out: &mut CodeWriter,
    entry: TypeEntry<'_>,
) -> Result<(), GenerationError> {
    match entry.type_def {
        TypeDef::Struct(struct_type) => message(generator, out, entry, struct_type),
        TypeDef::Enumeration(enumeration) => {
            out.comment("//", &enumeration.comment);
            enumeration_body(out, enumeration.name, &enum_values(generator.model(), entry));
            Ok(())
        }
        TypeDef::Array(_) | TypeDef::Alias(_) => Ok(()),
    }
}

fn message(
    generator: &ProtoGenerator<'_>,
    out: &mut CodeWriter,
    entry: TypeEntry<'_>,
    struct_type: &StructType,
) -> Result<(), GenerationError> {
    let fields = message_fields(generator.model(), entry, struct_type);
    debug!(message:% = struct_type.name, fields = fields.len(); "Writing message");

    out.comment("//", &struct_type.comment);
    out.line(format!("message {} {{", struct_type.name));
    out.try_indented(|out| {
        let mut nested = false;
        for (index, inner) in struct_type.inner_types.iter().enumerate() {
            if !is_declared(inner) {
                continue;
            }
            if nested {
                out.blank();
            }
            nested = true;
            let inner_entry = TypeEntry {
                id: entry.id.with_inner(index),
                package: entry.package,
                outer: Some(struct_type),
                type_def: inner,
            };
            declaration(generator, out, inner_entry)?;
        }
        if nested && !fields.is_empty() {
            out.blank();
        }
        for (index, field) in fields.iter().enumerate() {
            field_line(generator, out, field, index + 1)?;
        }
        Ok(())
    })?;
    out.line("}");
    Ok(())
}

/// Instance fields of the base chain, farthest base first, followed by the
/// struct's own. Their position is the field number.
pub(super) fn message_fields<'a>(
    model: &'a Model,
    entry: TypeEntry<'a>,
    struct_type: &'a StructType,
) -> Vec<&'a Field> {
    let mut fields = Vec::new();
    for base in model.base_chain(entry.id).into_iter().rev() {
        if let Some(base) = model.type_def(base).and_then(TypeDef::as_struct) {
            fields.extend(base.instance_fields());
        }
    }
    fields.extend(struct_type.instance_fields());
    fields
}

fn field_line(
    generator: &ProtoGenerator<'_>,
    out: &mut CodeWriter,
    field: &Field,
    number: usize,
) -> Result<(), GenerationError> {
    let value = generator.field_type(&field.type_ref)?;
    out.comment("//", &field.comment);

    let declaration = match &field.key {
        Some(key) => {
            let key = generator.field_type(key)?;
            if key.repeated || value.repeated || field.array_size.is_some() {
                warn!(field:% = field.name; "Map fields cannot be repeated, emitting a plain map");
            }
            format!("map<{}, {}> {}", key.name, value.name, field.name)
        }
        None => {
            if value.repeated && field.array_size.is_some() {
                debug!(field:% = field.name; "Collapsing nested repeated type");
            }
            let label = if value.repeated || field.array_size.is_some() {
                "repeated "
            } else {
                ""
            };
            format!("{label}{} {}", value.name, field.name)
        }
    };
    out.line(format!("{declaration} = {number};"));
    Ok(())
}

/// Enumerators as written to the schema.
///
/// Base enumerators are folded in and every name gets the enum prefix (see
/// [`enumerator_name`]). Proto3 requires the first value to be
/// zero: an existing zero-valued enumerator is moved to the front, otherwise
/// `<NAME>_UNSPECIFIED = 0` is added.
pub(super) fn enum_values(model: &Model, entry: TypeEntry<'_>) -> Vec<(String, i64)> {
    let enumeration = entry.type_def.name();
    let mut values: Vec<(String, i64)> = type_map::folded_enumerators(model, entry)
        .into_iter()
        .map(|(name, value)| (enumerator_name(enumeration, name), value))
        .collect();

    match values.iter().position(|(_, value)| *value == 0) {
        Some(0) => {}
        Some(index) => {
            let zero = values.remove(index);
            values.insert(0, zero);
        }
        None => {
            let name = unspecified_name(enumeration);
            trace!(enumerator = name; "Adding zero enumerator");
            values.insert(0, (name, 0));
        }
    }
    values
}

fn enumeration_body(out: &mut CodeWriter, name: impl std::fmt::Display, values: &[(String, i64)]) {
    let mut seen = BTreeSet::new();
    let aliased = values.iter().any(|(_, value)| !seen.insert(*value));

    out.line(format!("enum {name} {{"));
    out.indented(|out| {
        if aliased {
            out.line("option allow_alias = true;");
        }
        for (enumerator, value) in values {
            out.line(format!("{enumerator} = {value};"));
        }
    });
    out.line("}");
}
