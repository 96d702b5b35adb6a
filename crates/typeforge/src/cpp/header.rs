//! Header (`include/<Type>.h`) generation.

use std::collections::BTreeSet;

use typeforge_core::model::{
    Constructor, Field, Friend, Method, MethodModifier, Parameter, StructType, TypeDef, TypeEntry,
    TypeRef, Visibility,
};

use crate::{
    error::GenerationError,
    text::{BANNER, CodeWriter},
    type_map::{self, Target},
};

use super::{
    CppGenerator, INDENT, MEMBER_BLOCK_ORDER, accessor_fields, close_namespace, getter_name,
    has_authored_default_constructor, has_fields_constructor, namespace_of, open_namespace,
    setter_name,
};

/// A titled group of member declarations inside an access block.
struct Section {
    title: &'static str,
    lines: Vec<String>,
}

impl Section {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            lines: Vec::new(),
        }
    }
}

pub(super) fn struct_header(
    generator: &CppGenerator<'_>,
    entry: TypeEntry<'_>,
    struct_type: &StructType,
) -> Result<String, GenerationError> {
    let name = struct_type.name.to_string();
    let namespace = namespace_of(entry);
    let ns = namespace.as_deref();
    let guard = include_guard(ns, &name);

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line(format!("#ifndef {guard}"));
    out.line(format!("#define {guard}"));
    out.blank();

    for include in standard_includes(struct_type) {
        out.line(format!("#include <{include}>"));
    }
    let project = generator.project_includes(&name, struct_references(struct_type))?;
    if !project.is_empty() {
        out.blank();
        for stem in project {
            out.line(format!("#include \"{stem}.h\""));
        }
    }
    out.blank();

    open_namespace(&mut out, ns);
    doc_block(&mut out, "class", &name, &struct_type.comment);

    let base = match &struct_type.base {
        Some(base) => format!(" : public {}", generator.type_name(base, ns)?),
        None => String::new(),
    };
    out.line(format!("class {name}{base} {{"));

    if !struct_type.inner_types.is_empty() {
        out.line("public:");
        out.try_indented(|out| {
            for (index, inner) in struct_type.inner_types.iter().enumerate() {
                let inner_entry = TypeEntry {
                    id: entry.id.with_inner(index),
                    package: entry.package,
                    outer: Some(struct_type),
                    type_def: inner,
                };
                nested_declaration(generator, out, inner_entry, ns)?;
                out.blank();
            }
            Ok(())
        })?;
    }

    field_blocks(generator, &mut out, struct_type, ns, struct_type.options.threading)?;

    for visibility in MEMBER_BLOCK_ORDER {
        let sections = member_sections(generator, entry, struct_type, visibility, ns)?;
        if sections.iter().all(|section| section.lines.is_empty()) {
            continue;
        }
        out.line(format!("{}:", visibility.as_str()));
        out.indented(|out| {
            for section in sections.iter().filter(|section| !section.lines.is_empty()) {
                out.line(format!("// {}", section.title));
                for line in &section.lines {
                    out.line(line);
                }
                out.blank();
            }
        });
    }

    if !struct_type.friends.is_empty() {
        out.indented(|out| {
            for friend in &struct_type.friends {
                out.line(friend_declaration(friend));
            }
        });
    }
    out.line("};");
    out.blank();

    close_namespace(&mut out, ns);
    out.line(format!("#endif  // {guard}"));
    Ok(out.finish())
}

pub(super) fn enumeration_header(generator: &CppGenerator<'_>, entry: TypeEntry<'_>) -> String {
    let name = entry.type_def.name().to_string();
    let namespace = namespace_of(entry);
    let ns = namespace.as_deref();
    let guard = include_guard(ns, &name);

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line(format!("#ifndef {guard}"));
    out.line(format!("#define {guard}"));
    out.blank();
    out.line("#include <cstdint>");
    out.blank();

    open_namespace(&mut out, ns);
    doc_block(&mut out, "enum", &name, entry.type_def.comment());
    enumeration_body(generator, &mut out, entry);
    out.blank();
    close_namespace(&mut out, ns);
    out.line(format!("#endif  // {guard}"));
    out.finish()
}

/// Header of a named array or alias: a single `using` declaration.
pub(super) fn using_header(
    generator: &CppGenerator<'_>,
    entry: TypeEntry<'_>,
) -> Result<String, GenerationError> {
    let name = entry.type_def.name().to_string();
    let namespace = namespace_of(entry);
    let ns = namespace.as_deref();
    let guard = include_guard(ns, &name);

    let mut includes: BTreeSet<&str> = BTreeSet::from(["cstdint", "string"]);
    if let TypeDef::Array(array) = entry.type_def {
        includes.insert(if array.size.is_some() { "array" } else { "vector" });
    }
    let referenced = using_reference(entry.type_def);

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line(format!("#ifndef {guard}"));
    out.line(format!("#define {guard}"));
    out.blank();
    for include in includes {
        out.line(format!("#include <{include}>"));
    }
    let project = generator.project_includes(&name, referenced)?;
    if !project.is_empty() {
        out.blank();
        for stem in project {
            out.line(format!("#include \"{stem}.h\""));
        }
    }
    out.blank();

    open_namespace(&mut out, ns);
    out.comment("//", entry.type_def.comment());
    out.line(using_declaration(generator, entry.type_def, ns)?);
    out.blank();
    close_namespace(&mut out, ns);
    out.line(format!("#endif  // {guard}"));
    Ok(out.finish())
}

/// `COM_EXAMPLE_ORDER_H` for `com::example::Order`, `PERSON_H` for `Person`.
fn include_guard(namespace: Option<&str>, name: &str) -> String {
    let mut segments: Vec<&str> = namespace
        .map(|namespace| namespace.split("::").collect())
        .unwrap_or_default();
    segments.push(name);
    format!("{}_H", segments.join("_").to_uppercase())
}

fn doc_block(out: &mut CodeWriter, tag: &str, name: &str, comment: &[String]) {
    out.line("/**");
    out.line(format!(" * @{tag} {name}"));
    if let Some((first, rest)) = comment.split_first() {
        out.line(format!(" * @brief {first}"));
        for line in rest {
            out.line(format!(" * {line}"));
        }
    }
    out.line(" */");
}

fn standard_includes(struct_type: &StructType) -> BTreeSet<&'static str> {
    let mut includes = BTreeSet::from(["cstdint", "string"]);
    let inner_fields = struct_type
        .inner_types
        .iter()
        .filter_map(TypeDef::as_struct)
        .flat_map(|inner| &inner.fields);
    for field in struct_type.fields.iter().chain(inner_fields) {
        if field.array_size.is_some() {
            includes.insert("array");
        }
        if field.key.is_some() {
            includes.insert("map");
        }
    }
    for inner in &struct_type.inner_types {
        if let TypeDef::Array(array) = inner {
            includes.insert(if array.size.is_some() { "array" } else { "vector" });
        }
    }
    if struct_type.options.threading {
        includes.insert("mutex");
    }
    includes
}

/// Every type reference a struct declaration mentions.
fn struct_references(struct_type: &StructType) -> Vec<&TypeRef> {
    let mut references: Vec<&TypeRef> = struct_type.base.iter().collect();
    for field in &struct_type.fields {
        references.push(&field.type_ref);
        references.extend(&field.key);
    }
    for method in &struct_type.methods {
        references.extend(&method.returns);
        references.extend(method.parameters.iter().map(|parameter| &parameter.type_ref));
    }
    for constructor in &struct_type.constructors {
        references.extend(constructor.parameters.iter().map(|parameter| &parameter.type_ref));
    }
    for inner in &struct_type.inner_types {
        match inner {
            TypeDef::Struct(inner) => {
                for field in &inner.fields {
                    references.push(&field.type_ref);
                    references.extend(&field.key);
                }
            }
            other => references.extend(using_reference(other)),
        }
    }
    references
}

fn using_reference(type_def: &TypeDef) -> Option<&TypeRef> {
    match type_def {
        TypeDef::Array(array) => array.element_type.as_ref(),
        TypeDef::Alias(alias) => alias.actual_type.as_ref(),
        _ => None,
    }
}

fn using_declaration(
    generator: &CppGenerator<'_>,
    type_def: &TypeDef,
    ns: Option<&str>,
) -> Result<String, GenerationError> {
    let name = type_def.name();
    let missing = || GenerationError::UnresolvedReference { name };
    match type_def {
        TypeDef::Array(array) => {
            let element = array.element_type.as_ref().ok_or_else(missing)?;
            let element = generator.type_name(element, ns)?;
            Ok(match array.size {
                Some(size) => format!("using {name} = std::array<{element}, {size}>;"),
                None => format!("using {name} = std::vector<{element}>;"),
            })
        }
        TypeDef::Alias(alias) => {
            let actual = alias.actual_type.as_ref().ok_or_else(missing)?;
            Ok(format!("using {name} = {};", generator.type_name(actual, ns)?))
        }
        TypeDef::Struct(_) | TypeDef::Enumeration(_) => Err(missing()),
    }
}

/// Declaration of an inner type inside its outer class.
fn nested_declaration(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    entry: TypeEntry<'_>,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    match entry.type_def {
        TypeDef::Struct(inner) => {
            out.comment("//", &inner.comment);
            out.line(format!("class {} {{", inner.name));
            field_blocks(generator, out, inner, ns, false)?;
            out.line("};");
        }
        TypeDef::Enumeration(_) => {
            out.comment("//", entry.type_def.comment());
            enumeration_body(generator, out, entry);
        }
        TypeDef::Array(_) | TypeDef::Alias(_) => {
            out.comment("//", entry.type_def.comment());
            out.line(using_declaration(generator, entry.type_def, ns)?);
        }
    }
    Ok(())
}

fn enumeration_body(generator: &CppGenerator<'_>, out: &mut CodeWriter, entry: TypeEntry<'_>) {
    let Some(enumeration) = entry.type_def.as_enumeration() else {
        return;
    };
    let keyword = if enumeration.is_enum_class {
        "enum class"
    } else {
        "enum"
    };
    let underlying = underlying_type(generator, enumeration.underlying_type.as_deref());
    out.line(format!("{keyword} {} : {underlying} {{", enumeration.name));
    out.indented(|out| {
        for (name, value) in type_map::folded_enumerators(generator.model(), entry) {
            out.line(format!("{name} = {value},"));
        }
    });
    out.line("};");
}

/// Maps an underlying type naming a primitive; other spellings pass through.
fn underlying_type(generator: &CppGenerator<'_>, underlying: Option<&str>) -> String {
    let Some(underlying) = underlying else {
        return "int".to_string();
    };
    generator
        .model()
        .basic_types()
        .find(|(_, basic)| basic.name == underlying)
        .map(|(_, basic)| type_map::cpp_primitive(basic.kind()).to_string())
        .unwrap_or_else(|| underlying.to_string())
}

fn field_blocks(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    ns: Option<&str>,
    with_mutex: bool,
) -> Result<(), GenerationError> {
    for visibility in Visibility::ALL {
        let fields: Vec<&Field> = struct_type
            .fields
            .iter()
            .filter(|field| field.visibility == visibility)
            .collect();
        let mutex = with_mutex && visibility == Visibility::Private;
        if fields.is_empty() && !mutex {
            continue;
        }

        out.line(format!("{}:", visibility.as_str()));
        out.try_indented(|out| {
            for field in fields {
                out.comment("//", &field.comment);
                out.line(field_declaration(generator, field, ns)?);
            }
            if mutex {
                out.line("mutable std::mutex mutex_;");
            }
            Ok(())
        })?;
        out.blank();
    }
    Ok(())
}

fn field_declaration(
    generator: &CppGenerator<'_>,
    field: &Field,
    ns: Option<&str>,
) -> Result<String, GenerationError> {
    let ty = generator.field_type(field, ns)?;
    let name = field.name;
    if field.is_static {
        return Ok(format!("static {ty} {name};"));
    }
    if let Some(bits) = generator.bit_field_width(field)? {
        return Ok(format!("{ty} {name} : {bits};"));
    }
    match default_value(generator, field, ns)? {
        Some(value) => Ok(format!("{ty} {name} = {value};")),
        None => Ok(format!("{ty} {name};")),
    }
}

/// Default value of a single-valued field as a C++ expression.
///
/// On an enumeration field an identifier is qualified with the enumeration
/// name and an integer is cast to it, since an `enum class` does not convert
/// implicitly.
pub(super) fn default_value(
    generator: &CppGenerator<'_>,
    field: &Field,
    ns: Option<&str>,
) -> Result<Option<String>, GenerationError> {
    let Some(default) = &field.default else {
        return Ok(None);
    };
    if !field.is_single_valued() {
        return Ok(None);
    }
    if !is_enumeration(generator, &field.type_ref)? {
        return Ok(Some(default.to_string()));
    }
    let enumeration = generator.type_name(&field.type_ref, ns)?;
    let value = match default.as_integer() {
        Some(value) => format!("static_cast<{enumeration}>({value})"),
        None if default.is_identifier() => format!("{enumeration}::{default}"),
        None => default.to_string(),
    };
    Ok(Some(value))
}

fn is_enumeration(
    generator: &CppGenerator<'_>,
    type_ref: &TypeRef,
) -> Result<bool, GenerationError> {
    Ok(matches!(
        type_map::target(generator.model(), type_ref)?,
        Target::Declared(TypeEntry {
            type_def: TypeDef::Enumeration(_),
            ..
        })
    ))
}

fn member_sections(
    generator: &CppGenerator<'_>,
    entry: TypeEntry<'_>,
    struct_type: &StructType,
    visibility: Visibility,
    ns: Option<&str>,
) -> Result<Vec<Section>, GenerationError> {
    let name = struct_type.name;
    let public = visibility == Visibility::Public;
    let mut constructors = Section::new(if public {
        "Constructors and Destructor"
    } else {
        "Constructors"
    });
    let mut methods = Section::new("Methods");

    if public {
        if !has_authored_default_constructor(struct_type) {
            constructors.lines.push(format!("{name}();"));
        }
        if has_fields_constructor(struct_type) {
            let parameters = struct_type
                .instance_fields()
                .map(|field| {
                    Ok(format!(
                        "{} {}",
                        generator.field_param_type(field, ns)?,
                        field.name
                    ))
                })
                .collect::<Result<Vec<_>, GenerationError>>()?;
            let explicit = if parameters.len() == 1 {
                "explicit "
            } else {
                ""
            };
            constructors
                .lines
                .push(format!("{explicit}{name}({});", parameters.join(", ")));
        }
    }

    for constructor in struct_type
        .constructors
        .iter()
        .filter(|constructor| constructor.visibility == visibility)
    {
        constructors
            .lines
            .push(constructor_declaration(generator, name.to_string(), constructor, ns)?);
    }

    if public {
        if struct_type.options.copy_semantics {
            constructors
                .lines
                .push(format!("{name}(const {name}& other);"));
            constructors
                .lines
                .push(format!("{name}& operator=(const {name}& other);"));
        }
        if struct_type.options.move_semantics {
            constructors
                .lines
                .push(format!("{name}({name}&& other) noexcept;"));
            constructors
                .lines
                .push(format!("{name}& operator=({name}&& other) noexcept;"));
        }
        if struct_type.has_virtual_methods() || generator.is_extended(entry) {
            constructors.lines.push(format!("virtual ~{name}();"));
        } else {
            constructors.lines.push(format!("~{name}();"));
        }
    }

    for method in struct_type
        .methods
        .iter()
        .filter(|method| method.visibility == visibility)
    {
        if let Some(description) = &method.description {
            methods.lines.push(format!("// {description}"));
        }
        methods
            .lines
            .push(format!("{};", method_signature(generator, method, ns)?));
    }

    let mut sections = vec![constructors, methods];
    if !public {
        return Ok(sections);
    }

    let mut accessors = Section::new("Getters and Setters");
    for field in accessor_fields(struct_type) {
        let ty = generator.field_type(field, ns)?;
        let by_value = generator.field_is_scalar(field)? || struct_type.options.threading;
        let getter = getter_name(field);
        if by_value {
            accessors.lines.push(format!("{ty} {getter}() const;"));
        } else {
            accessors.lines.push(format!("const {ty}& {getter}() const;"));
        }
        accessors.lines.push(format!(
            "void {}({} value);",
            setter_name(field),
            generator.field_param_type(field, ns)?
        ));
    }
    sections.push(accessors);

    let mut operators = Section::new("Operators");
    if struct_type.options.operators {
        operators
            .lines
            .push(format!("bool operator==(const {name}& other) const;"));
        operators
            .lines
            .push(format!("bool operator!=(const {name}& other) const;"));
    }
    sections.push(operators);

    let mut serialization = Section::new("Serialization");
    if struct_type.options.serialization {
        serialization
            .lines
            .push("std::string serialize() const;".to_string());
        serialization
            .lines
            .push("bool deserialize(const std::string& data);".to_string());
    }
    sections.push(serialization);

    Ok(sections)
}

fn constructor_declaration(
    generator: &CppGenerator<'_>,
    name: String,
    constructor: &Constructor,
    ns: Option<&str>,
) -> Result<String, GenerationError> {
    let explicit = if constructor.explicit { "explicit " } else { "" };
    Ok(format!(
        "{explicit}{name}({});",
        parameter_list(generator, &constructor.parameters, ns)?
    ))
}

/// `Type a, const Other& b`
pub(super) fn parameter_list(
    generator: &CppGenerator<'_>,
    parameters: &[Parameter],
    ns: Option<&str>,
) -> Result<String, GenerationError> {
    let parameters = parameters
        .iter()
        .map(|parameter| {
            Ok(format!(
                "{} {}",
                generator.param_type(&parameter.type_ref, ns)?,
                parameter.name
            ))
        })
        .collect::<Result<Vec<_>, GenerationError>>()?;
    Ok(parameters.join(", "))
}

/// Return type of a method; `void` when it returns nothing.
pub(super) fn return_type(
    generator: &CppGenerator<'_>,
    method: &Method,
    ns: Option<&str>,
) -> Result<String, GenerationError> {
    match &method.returns {
        Some(returns) => generator.type_name(returns, ns),
        None => Ok("void".to_string()),
    }
}

/// In-class method signature:
/// `[static] [virtual] Type name(params) [const] [noexcept] [override] [= 0]`.
fn method_signature(
    generator: &CppGenerator<'_>,
    method: &Method,
    ns: Option<&str>,
) -> Result<String, GenerationError> {
    let mut signature = String::new();
    if method.has(MethodModifier::Static) {
        signature.push_str("static ");
    }
    if method.has(MethodModifier::Virtual) || method.has(MethodModifier::PureVirtual) {
        signature.push_str("virtual ");
    }
    signature.push_str(&format!(
        "{} {}({})",
        return_type(generator, method, ns)?,
        method.name,
        parameter_list(generator, &method.parameters, ns)?
    ));
    for (modifier, suffix) in [
        (MethodModifier::Const, " const"),
        (MethodModifier::Noexcept, " noexcept"),
        (MethodModifier::Override, " override"),
        (MethodModifier::PureVirtual, " = 0"),
    ] {
        if method.has(modifier) {
            signature.push_str(suffix);
        }
    }
    Ok(signature)
}

fn friend_declaration(friend: &Friend) -> String {
    match friend {
        Friend::Class(name) => format!("friend class {name};"),
        Friend::Function(signature) => {
            format!("friend {};", signature.trim().trim_end_matches(';'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use typeforge_core::model::{
        BasicTypeId, EnumerationType, Enumerator, Expression, Model, PrimitiveTypeDef,
    };

    use crate::config::CppConfig;

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard(None, "Person"), "PERSON_H");
        assert_eq!(
            include_guard(Some("com::example"), "OrderItem"),
            "COM_EXAMPLE_ORDERITEM_H"
        );
    }

    #[test]
    fn test_friend_declaration() {
        assert_eq!(
            friend_declaration(&Friend::Class("Registry".to_string())),
            "friend class Registry;"
        );
        assert_eq!(
            friend_declaration(&Friend::Function(
                "std::ostream& operator<<(std::ostream& os, const Person& p);".to_string()
            )),
            "friend std::ostream& operator<<(std::ostream& os, const Person& p);"
        );
    }

    #[test]
    fn test_doc_block() {
        let mut out = CodeWriter::new(INDENT);
        doc_block(
            &mut out,
            "class",
            "Person",
            &["A person entity".to_string(), "with details".to_string()],
        );
        assert_eq!(
            out.finish(),
            "/**\n * @class Person\n * @brief A person entity\n * with details\n */\n"
        );
    }

    #[test]
    fn test_enumeration_defaults_are_typed() {
        let mut model = Model::new()
            .with_primitives(PrimitiveTypeDef::new("Builtins").with(BasicTypeId::value("uint32", 32)))
            .with_type(
                EnumerationType::new("Color")
                    .with_enumerator(Enumerator::new("RED"))
                    .with_enumerator(Enumerator::new("BLUE")),
            )
            .with_type(
                StructType::new("Paint")
                    .with_field(Field::new("primary", "Color").with_default(Expression::integer(1)))
                    .with_field(
                        Field::new("accent", "Color").with_default(Expression::identifier("BLUE")),
                    )
                    .with_field(Field::new("coats", "uint32").with_default(Expression::integer(2))),
            );
        let diagnostics = typeforge_sema::resolve(&mut model);
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");

        let config = CppConfig::default();
        let generator = CppGenerator::new(&model, &config);
        let paint = model
            .types
            .iter()
            .find_map(TypeDef::as_struct)
            .expect("struct");
        let defaults: Vec<Option<String>> = paint
            .fields
            .iter()
            .map(|field| default_value(&generator, field, None).expect("default"))
            .collect();

        assert_eq!(
            defaults,
            vec![
                Some("static_cast<Color>(1)".to_string()),
                Some("Color::BLUE".to_string()),
                Some("2".to_string()),
            ]
        );
    }

    #[test]
    fn test_method_signature() {
        let mut model = Model::new()
            .with_primitives(PrimitiveTypeDef::new("Builtins").with(BasicTypeId::value("uint32", 32)))
            .with_type(
                StructType::new("Shape")
                    .with_method(
                        Method::new("area")
                            .returning("uint32")
                            .with_modifier(MethodModifier::Const)
                            .with_modifier(MethodModifier::PureVirtual),
                    )
                    .with_method(Method::new("lookup").returning("Missing")),
            );
        let diagnostics = typeforge_sema::resolve(&mut model);
        assert!(diagnostics.has_errors());

        let config = CppConfig::default();
        let generator = CppGenerator::new(&model, &config);
        let shape = model
            .types
            .iter()
            .find_map(TypeDef::as_struct)
            .expect("struct");

        assert_eq!(
            method_signature(&generator, &shape.methods[0], None).expect("signature"),
            "virtual uint32_t area() const = 0"
        );
        assert!(method_signature(&generator, &shape.methods[1], None).is_err());
    }
}
