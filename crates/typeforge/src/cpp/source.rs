//! Implementation (`src/<Type>.cpp`) generation.
//!
//! Every constructor and method declared in the header gets exactly one
//! definition here. Synthesized members follow fixed patterns:
//!
//! - getters return the field, setters assign through `this->`
//! - copy and move members handle the base first, then each field in
//!   declaration order
//! - `serialize`/`deserialize` use a `key=value;` text encoding

use typeforge_core::model::{
    Constructor, Field, Method, MethodModifier, PrimitiveKind, StructType, TypeDef, TypeEntry,
};

use crate::{
    error::GenerationError,
    text::{BANNER, CodeWriter},
    type_map::{self, Target},
};

use super::{
    CppGenerator, INDENT, accessor_fields, close_namespace, getter_name,
    has_authored_default_constructor, has_fields_constructor, namespace_of, open_namespace,
    setter_name,
    header::{default_value, parameter_list, return_type},
};

/// How a field is written to and read from the `key=value;` encoding.
enum Encoding {
    Text,
    Boolean,
    Integer,
    Float,
    Enumeration,
}

pub(super) fn struct_source(
    generator: &CppGenerator<'_>,
    entry: TypeEntry<'_>,
    struct_type: &StructType,
) -> Result<String, GenerationError> {
    let name = struct_type.name.to_string();
    let namespace = namespace_of(entry);
    let ns = namespace.as_deref();
    let options = struct_type.options;

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line(format!("#include \"{name}.h\""));
    if options.serialization || options.move_semantics {
        out.blank();
        if options.serialization {
            out.line("#include <sstream>");
        }
        if options.move_semantics {
            out.line("#include <utility>");
        }
    }
    out.blank();
    open_namespace(&mut out, ns);

    let statics: Vec<&Field> = struct_type
        .fields
        .iter()
        .filter(|field| field.is_static)
        .collect();
    for field in &statics {
        let ty = generator.field_type(field, ns)?;
        match default_value(generator, field, ns)? {
            Some(value) => out.line(format!("{ty} {name}::{} = {value};", field.name)),
            None => out.line(format!("{ty} {name}::{}{{}};", field.name)),
        };
    }
    if !statics.is_empty() {
        out.blank();
    }

    constructors(generator, &mut out, struct_type, ns)?;
    special_members(generator, &mut out, struct_type, ns)?;

    for method in &struct_type.methods {
        if !method.has(MethodModifier::PureVirtual) {
            method_definition(generator, &mut out, &name, method, ns)?;
        }
    }

    accessors(generator, &mut out, struct_type, ns)?;

    if options.operators {
        equality_operators(&mut out, struct_type);
    }
    if options.serialization {
        serialization(generator, &mut out, struct_type, ns)?;
    }

    close_namespace(&mut out, ns);
    Ok(out.finish())
}

/// Writes a function definition with an optional initializer list.
fn definition(out: &mut CodeWriter, signature: &str, initializers: &[String], body: &[String]) {
    let open = if body.is_empty() { "{}" } else { "{" };
    if initializers.is_empty() {
        out.line(format!("{signature} {open}"));
    } else {
        out.line(signature);
        out.indented(|out| {
            out.line(format!(": {} {open}", initializers.join(", ")));
        });
    }
    if !body.is_empty() {
        out.indented(|out| {
            for line in body {
                out.line(line);
            }
        });
        out.line("}");
    }
    out.blank();
}

fn body_lines(body: Option<&str>) -> Vec<String> {
    body.map(|body| body.trim().lines().map(str::to_string).collect())
        .unwrap_or_default()
}

fn constructors(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    let name = struct_type.name;

    if !has_authored_default_constructor(struct_type) {
        definition(out, &format!("{name}::{name}()"), &[], &[]);
    }

    if has_fields_constructor(struct_type) {
        let mut parameters = Vec::new();
        let mut initializers = Vec::new();
        for field in struct_type.instance_fields() {
            parameters.push(format!(
                "{} {}",
                generator.field_param_type(field, ns)?,
                field.name
            ));
            initializers.push(format!("{0}({0})", field.name));
        }
        definition(
            out,
            &format!("{name}::{name}({})", parameters.join(", ")),
            &initializers,
            &[],
        );
    }

    for constructor in &struct_type.constructors {
        authored_constructor(generator, out, struct_type, constructor, ns)?;
    }

    definition(out, &format!("{name}::~{name}()"), &[], &[]);
    Ok(())
}

fn authored_constructor(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    constructor: &Constructor,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    let name = struct_type.name;
    let signature = format!(
        "{name}::{name}({})",
        parameter_list(generator, &constructor.parameters, ns)?
    );
    let initializers: Vec<String> = constructor
        .initializers
        .iter()
        .map(|initializer| format!("{}({})", initializer.member, initializer.value))
        .collect();
    definition(
        out,
        &signature,
        &initializers,
        &body_lines(constructor.body.as_deref()),
    );
    Ok(())
}

/// Copy and move constructors and assignment operators.
fn special_members(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    let name = struct_type.name;
    let base = match &struct_type.base {
        Some(base) => Some(generator.type_name(base, ns)?),
        None => None,
    };
    let fields: Vec<&Field> = struct_type.instance_fields().collect();

    if struct_type.options.copy_semantics {
        let mut initializers: Vec<String> =
            base.iter().map(|base| format!("{base}(other)")).collect();
        initializers.extend(fields.iter().map(|field| format!("{0}(other.{0})", field.name)));
        definition(
            out,
            &format!("{name}::{name}(const {name}& other)"),
            &initializers,
            &[],
        );

        let assignments = assignment_body(base.as_deref(), &fields, false);
        definition(
            out,
            &format!("{name}& {name}::operator=(const {name}& other)"),
            &[],
            &assignments,
        );
    }

    if struct_type.options.move_semantics {
        let mut initializers: Vec<String> = base
            .iter()
            .map(|base| format!("{base}(std::move(other))"))
            .collect();
        initializers.extend(
            fields
                .iter()
                .map(|field| format!("{0}(std::move(other.{0}))", field.name)),
        );
        definition(
            out,
            &format!("{name}::{name}({name}&& other) noexcept"),
            &initializers,
            &[],
        );

        let assignments = assignment_body(base.as_deref(), &fields, true);
        definition(
            out,
            &format!("{name}& {name}::operator=({name}&& other) noexcept"),
            &[],
            &assignments,
        );
    }
    Ok(())
}

/// Body of a copy (or, with `moving`, move) assignment operator.
fn assignment_body(base: Option<&str>, fields: &[&Field], moving: bool) -> Vec<String> {
    let source = |member: &str| {
        if moving {
            format!("std::move({member})")
        } else {
            member.to_string()
        }
    };
    let mut body = vec!["if (this != &other) {".to_string()];
    if let Some(base) = base {
        body.push(format!("{INDENT}{base}::operator=({});", source("other")));
    }
    for field in fields {
        body.push(format!(
            "{INDENT}this->{} = {};",
            field.name,
            source(&format!("other.{}", field.name))
        ));
    }
    body.push("}".to_string());
    body.push("return *this;".to_string());
    body
}

fn method_definition(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    class: &str,
    method: &Method,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    let returns = return_type(generator, method, ns)?;
    let mut signature = format!(
        "{returns} {class}::{}({})",
        method.name,
        parameter_list(generator, &method.parameters, ns)?
    );
    if method.has(MethodModifier::Const) {
        signature.push_str(" const");
    }
    if method.has(MethodModifier::Noexcept) {
        signature.push_str(" noexcept");
    }

    let mut body = body_lines(method.body.as_deref());
    if body.is_empty() && method.returns.is_some() {
        body.push(format!("return {returns}{{}};"));
    }
    definition(out, &signature, &[], &body);
    Ok(())
}

fn accessors(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    let class = struct_type.name;
    let threading = struct_type.options.threading;
    let lock = "std::lock_guard<std::mutex> lock(mutex_);".to_string();

    for field in accessor_fields(struct_type) {
        let ty = generator.field_type(field, ns)?;
        let by_value = generator.field_is_scalar(field)? || threading;
        let returns = if by_value { ty } else { format!("const {ty}&") };

        let mut getter = Vec::new();
        let mut setter = Vec::new();
        if threading {
            getter.push(lock.clone());
            setter.push(lock.clone());
        }
        getter.push(format!("return {};", field.name));
        setter.push(format!("this->{} = value;", field.name));

        definition(
            out,
            &format!("{returns} {class}::{}() const", getter_name(field)),
            &[],
            &getter,
        );
        definition(
            out,
            &format!(
                "void {class}::{}({} value)",
                setter_name(field),
                generator.field_param_type(field, ns)?
            ),
            &[],
            &setter,
        );
    }
    Ok(())
}

fn equality_operators(out: &mut CodeWriter, struct_type: &StructType) {
    let class = struct_type.name;
    let comparisons: Vec<String> = struct_type
        .instance_fields()
        .map(|field| format!("{0} == other.{0}", field.name))
        .collect();

    let body = match comparisons.split_first() {
        None => vec!["return true;".to_string()],
        Some((first, rest)) => {
            let mut body = vec![format!("return {first}")];
            body.extend(rest.iter().map(|comparison| format!("{INDENT}&& {comparison}")));
            if let Some(last) = body.last_mut() {
                last.push(';');
            }
            body
        }
    };
    definition(
        out,
        &format!("bool {class}::operator==(const {class}& other) const"),
        &[],
        &body,
    );
    definition(
        out,
        &format!("bool {class}::operator!=(const {class}& other) const"),
        &[],
        &["return !(*this == other);".to_string()],
    );
}

/// Encoding of a field, or `None` for fields the text encoding skips
/// (structs, arrays, maps).
fn field_encoding(
    generator: &CppGenerator<'_>,
    field: &Field,
) -> Result<Option<Encoding>, GenerationError> {
    if !field.is_single_valued() {
        return Ok(None);
    }
    Ok(match type_map::target(generator.model(), &field.type_ref)? {
        Target::Basic(basic) => Some(match basic.kind() {
            PrimitiveKind::Text => Encoding::Text,
            PrimitiveKind::Boolean => Encoding::Boolean,
            PrimitiveKind::Integer { .. } => Encoding::Integer,
            PrimitiveKind::Float { .. } => Encoding::Float,
        }),
        Target::Declared(TypeEntry {
            type_def: TypeDef::Enumeration(_),
            ..
        }) => Some(Encoding::Enumeration),
        Target::Declared(_) => None,
    })
}

fn serialization(
    generator: &CppGenerator<'_>,
    out: &mut CodeWriter,
    struct_type: &StructType,
    ns: Option<&str>,
) -> Result<(), GenerationError> {
    let class = struct_type.name;
    let mut encoded = Vec::new();
    for field in struct_type.instance_fields() {
        if let Some(encoding) = field_encoding(generator, field)? {
            encoded.push((field, encoding, generator.field_type(field, ns)?));
        }
    }

    let mut serialize = Vec::new();
    let mut deserialize = Vec::new();
    if struct_type.options.threading {
        serialize.push("std::lock_guard<std::mutex> lock(mutex_);".to_string());
        deserialize.push("std::lock_guard<std::mutex> lock(mutex_);".to_string());
    }

    serialize.push("std::ostringstream out;".to_string());
    for (field, encoding, _) in &encoded {
        let value = match encoding {
            Encoding::Integer => format!("+this->{}", field.name),
            Encoding::Enumeration => format!("static_cast<long long>(this->{})", field.name),
            _ => format!("this->{}", field.name),
        };
        serialize.push(format!("out << \"{}=\" << {value} << ';';", field.name));
    }
    serialize.push("return out.str();".to_string());

    let one = INDENT;
    let two = INDENT.repeat(2);
    deserialize.extend([
        "std::istringstream in(data);".to_string(),
        "std::string entry;".to_string(),
        "while (std::getline(in, entry, ';')) {".to_string(),
        format!("{one}const auto separator = entry.find('=');"),
        format!("{one}if (separator == std::string::npos) {{"),
        format!("{two}return false;"),
        format!("{one}}}"),
        format!("{one}const std::string key = entry.substr(0, separator);"),
        format!("{one}const std::string value = entry.substr(separator + 1);"),
    ]);
    for (index, (field, encoding, ty)) in encoded.iter().enumerate() {
        let keyword = if index == 0 { "if" } else { "} else if" };
        deserialize.push(format!("{one}{keyword} (key == \"{}\") {{", field.name));
        let member = format!("this->{}", field.name);
        match encoding {
            Encoding::Text => deserialize.push(format!("{two}{member} = value;")),
            Encoding::Boolean => {
                deserialize.push(format!("{two}{member} = value == \"1\" || value == \"true\";"))
            }
            Encoding::Integer | Encoding::Enumeration => deserialize.extend([
                format!("{two}long long parsed = 0;"),
                format!("{two}std::istringstream(value) >> parsed;"),
                format!("{two}{member} = static_cast<{ty}>(parsed);"),
            ]),
            Encoding::Float => deserialize.extend([
                format!("{two}double parsed = 0.0;"),
                format!("{two}std::istringstream(value) >> parsed;"),
                format!("{two}{member} = static_cast<{ty}>(parsed);"),
            ]),
        }
    }
    if !encoded.is_empty() {
        deserialize.push(format!("{one}}}"));
    }
    deserialize.push("}".to_string());
    deserialize.push("return true;".to_string());

    definition(out, &format!("std::string {class}::serialize() const"), &[], &serialize);
    definition(
        out,
        &format!("bool {class}::deserialize(const std::string& data)"),
        &[],
        &deserialize,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_layouts() {
        let mut out = CodeWriter::new(INDENT);
        definition(&mut out, "Person::Person()", &[], &[]);
        definition(
            &mut out,
            "Person::Person(int32_t age)",
            &["age(age)".to_string()],
            &[],
        );
        definition(
            &mut out,
            "int32_t Person::twice() const",
            &[],
            &["return age * 2;".to_string()],
        );

        assert_eq!(
            out.finish(),
            "Person::Person() {}\n\
             \n\
             Person::Person(int32_t age)\n    : age(age) {}\n\
             \n\
             int32_t Person::twice() const {\n    return age * 2;\n}\n"
        );
    }

    #[test]
    fn test_body_lines_trims_surrounding_blank_lines() {
        assert_eq!(
            body_lines(Some("\n  return 1;\n")),
            vec!["return 1;".to_string()]
        );
        assert!(body_lines(None).is_empty());
    }
}
