//! Test stub (`test/<Type>Test.cpp`) generation.

use std::collections::HashSet;

use typeforge_core::model::{
    Field, MethodModifier, Model, StructType, TypeDef, TypeEntry, TypeId, Visibility,
};

use crate::{
    error::GenerationError,
    text::{BANNER, CodeWriter},
    type_map::{self, Target},
};

use super::{CppGenerator, INDENT, accessor_fields, getter_name, qualified_name, setter_name};

pub(super) fn struct_test(
    generator: &CppGenerator<'_>,
    entry: TypeEntry<'_>,
    struct_type: &StructType,
) -> Result<String, GenerationError> {
    let name = struct_type.name;
    let class = qualified_name(entry, None);

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line(format!("#include \"{name}.h\""));
    out.blank();
    out.line("#include <cassert>");
    out.line("#include <iostream>");
    out.blank();
    out.line("int main() {");

    out.try_indented(|out| {
        if !is_constructible(generator.model(), entry, struct_type) {
            out.line(format!(
                "std::cout << \"{name}Test: {name} cannot be default constructed\" << std::endl;"
            ));
            out.line("return 0;");
            return Ok(());
        }
        exercise(generator, out, struct_type, &class)?;
        out.line(format!("std::cout << \"{name}Test passed\" << std::endl;"));
        out.line("return 0;");
        Ok(())
    })?;

    out.line("}");
    Ok(out.finish())
}

/// A stub can create an instance when the class is concrete and its
/// zero-argument constructor, if authored, is public.
fn is_constructible(model: &Model, entry: TypeEntry<'_>, struct_type: &StructType) -> bool {
    let default_is_public = struct_type
        .constructors
        .iter()
        .filter(|constructor| constructor.parameters.is_empty())
        .all(|constructor| constructor.visibility == Visibility::Public);
    default_is_public && !is_abstract(model, entry.id, struct_type)
}

/// A class is abstract while some pure virtual method, declared by it or any
/// base, has no non-pure method of the same name in a more derived class.
fn is_abstract(model: &Model, id: TypeId, struct_type: &StructType) -> bool {
    let bases = model
        .base_chain(id)
        .into_iter()
        .filter_map(|base| model.type_def(base).and_then(TypeDef::as_struct));

    let mut implemented = HashSet::new();
    for declared in std::iter::once(struct_type).chain(bases) {
        let pending = declared.methods.iter().any(|method| {
            method.has(MethodModifier::PureVirtual) && !implemented.contains(&method.name)
        });
        if pending {
            return true;
        }
        implemented.extend(
            declared
                .methods
                .iter()
                .filter(|method| !method.has(MethodModifier::PureVirtual))
                .map(|method| method.name),
        );
    }
    false
}

fn exercise(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    class: &str,
) -> Result<(), GenerationError> {
    out.line(format!("{class} instance;"));

    for field in accessor_fields(struct_type) {
        let value = format!("{}{{}}", generator.field_type(field, None)?);
        out.line(format!("instance.{}({value});", setter_name(field)));
        if is_comparable(generator, field)? {
            out.line(format!(
                "assert(instance.{}() == {value});",
                getter_name(field)
            ));
        } else {
            out.line(format!("static_cast<void>(instance.{}());", getter_name(field)));
        }
    }

    let options = struct_type.options;
    if options.copy_semantics {
        out.line(format!("{class} copy(instance);"));
        if options.operators {
            out.line("assert(copy == instance);");
        }
    }
    if options.operators {
        out.line("assert(instance == instance);");
        out.line("assert(!(instance != instance));");
    }
    if options.serialization {
        out.line("const std::string encoded = instance.serialize();");
        out.line(format!("{class} restored;"));
        out.line("assert(restored.deserialize(encoded));");
    }
    Ok(())
}

/// Primitives, enumerations and aliases of scalars have `operator==`;
/// generated structs only when they opt in, which a stub cannot rely on.
fn is_comparable(generator: &CppGenerator<'_>, field: &Field) -> Result<bool, GenerationError> {
    let is_primitive = matches!(
        type_map::target(generator.model(), &field.type_ref)?,
        Target::Basic(_)
    );
    Ok(is_primitive || type_map::is_scalar(generator.model(), &field.type_ref)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use typeforge_core::model::{Constructor, Method};

    fn constructible(model: &Model, index: usize) -> bool {
        let entry = model.entry(TypeId::top_level(index)).expect("entry");
        let struct_type = entry.type_def.as_struct().expect("struct");
        is_constructible(model, entry, struct_type)
    }

    #[test]
    fn test_is_constructible() {
        let mut hidden = Constructor::new();
        hidden.visibility = Visibility::Private;
        let model = Model::new()
            .with_type(StructType::new("Plain"))
            .with_type(
                StructType::new("Shape")
                    .with_method(Method::new("area").with_modifier(MethodModifier::PureVirtual)),
            )
            .with_type(StructType::new("Singleton").with_constructor(hidden));

        assert!(constructible(&model, 0));
        assert!(!constructible(&model, 1));
        assert!(!constructible(&model, 2));
    }

    #[test]
    fn test_inherited_pure_virtual_methods() {
        let mut model = Model::new()
            .with_type(
                StructType::new("Shape")
                    .with_method(Method::new("area").with_modifier(MethodModifier::PureVirtual)),
            )
            .with_type(StructType::new("Polygon").with_base("Shape"))
            .with_type(
                StructType::new("Square")
                    .with_base("Polygon")
                    .with_method(Method::new("area").with_modifier(MethodModifier::Override)),
            );
        let diagnostics = typeforge_sema::resolve(&mut model);
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");

        assert!(!constructible(&model, 0));
        assert!(!constructible(&model, 1));
        assert!(constructible(&model, 2));
    }
}
