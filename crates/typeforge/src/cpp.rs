//! C++ class library generation.
//!
//! Produces, per declared type, a header under `include/`; per struct an
//! implementation under `src/` and a test stub under `test/`; and for the
//! whole model a `CMakeLists.txt` and `src/main.cpp`.
//!
//! The generator reads a resolved, validated model and never mutates it.
//! An unresolved reference is a [`GenerationError`], not a diagnostic.

mod cmake;
mod header;
mod main_entry;
mod source;
mod test_stub;

use std::collections::BTreeSet;

use log::{debug, info, trace};

use typeforge_core::model::{
    Field, Model, PrimitiveKind, StructType, TypeDef, TypeEntry, TypeRef, Visibility,
};

use crate::{
    config::CppConfig,
    error::GenerationError,
    output::GeneratedFiles,
    text::{CodeWriter, capitalize, sanitize_identifier},
    type_map::{self, Target},
};

const INDENT: &str = "    ";

/// Member function blocks are emitted in this order.
const MEMBER_BLOCK_ORDER: [Visibility; 3] =
    [Visibility::Public, Visibility::Protected, Visibility::Private];

/// Generates the C++ file set for a model.
pub struct CppGenerator<'a> {
    model: &'a Model,
    config: &'a CppConfig,
}

impl<'a> CppGenerator<'a> {
    pub fn new(model: &'a Model, config: &'a CppConfig) -> Self {
        Self { model, config }
    }

    /// Generates every C++ file, keyed by logical path.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the model contains a reference that
    /// scope resolution did not bind.
    pub fn generate(&self) -> Result<GeneratedFiles, GenerationError> {
        info!("Generating C++ sources");
        let mut files = GeneratedFiles::new();
        let mut structs = Vec::new();

        for entry in self.model.declared_types() {
            let name = entry.type_def.name();
            trace!(name:% = name, kind:% = entry.type_def.kind(); "Generating C++ type");
            match entry.type_def {
                TypeDef::Struct(struct_type) => {
                    files.insert(
                        header_path(entry),
                        header::struct_header(self, entry, struct_type)?,
                    );
                    files.insert(
                        source_path(entry),
                        source::struct_source(self, entry, struct_type)?,
                    );
                    if self.config.generate_tests() {
                        files.insert(
                            test_path(entry),
                            test_stub::struct_test(self, entry, struct_type)?,
                        );
                    }
                    structs.push(entry);
                }
                TypeDef::Enumeration(_) => {
                    files.insert(header_path(entry), header::enumeration_header(self, entry));
                }
                TypeDef::Array(_) | TypeDef::Alias(_) => {
                    files.insert(header_path(entry), header::using_header(self, entry)?);
                }
            }
        }

        files.insert("CMakeLists.txt", cmake::build_file(self, &structs));
        files.insert("src/main.cpp", main_entry::main_source(self));

        debug!(files = files.len(), structs = structs.len(); "C++ generation finished");
        Ok(files)
    }

    fn model(&self) -> &'a Model {
        self.model
    }

    /// CMake project name: configured name, model name, or `model`.
    fn project_name(&self) -> String {
        let name = self
            .config
            .project_name()
            .unwrap_or_else(|| self.model.name_or("model"));
        sanitize_identifier(name)
    }

    /// Spelling of a referenced type as seen from namespace `from`.
    fn type_name(&self, type_ref: &TypeRef, from: Option<&str>) -> Result<String, GenerationError> {
        match type_map::target(self.model, type_ref)? {
            Target::Basic(basic) => Ok(type_map::cpp_primitive(basic.kind()).to_string()),
            Target::Declared(entry) => Ok(qualified_name(entry, from)),
        }
    }

    /// Parameter spelling: scalars by value, everything else by `const&`.
    fn param_type(&self, type_ref: &TypeRef, from: Option<&str>) -> Result<String, GenerationError> {
        let name = self.type_name(type_ref, from)?;
        if type_map::is_scalar(self.model, type_ref)? {
            Ok(name)
        } else {
            Ok(format!("const {name}&"))
        }
    }

    /// Declared type of a field, including array and map wrappers.
    fn field_type(&self, field: &Field, from: Option<&str>) -> Result<String, GenerationError> {
        let value = self.type_name(&field.type_ref, from)?;
        let mapped = match &field.key {
            Some(key) => format!("std::map<{}, {value}>", self.type_name(key, from)?),
            None => value,
        };
        Ok(match field.array_size {
            Some(size) => format!("std::array<{mapped}, {size}>"),
            None => mapped,
        })
    }

    /// Parameter spelling of a whole field value.
    fn field_param_type(&self, field: &Field, from: Option<&str>) -> Result<String, GenerationError> {
        if field.is_single_valued() {
            self.param_type(&field.type_ref, from)
        } else {
            Ok(format!("const {}&", self.field_type(field, from)?))
        }
    }

    /// Returns `true` if the field is passed and returned by value.
    fn field_is_scalar(&self, field: &Field) -> Result<bool, GenerationError> {
        if field.is_single_valued() {
            type_map::is_scalar(self.model, &field.type_ref)
        } else {
            Ok(false)
        }
    }

    /// Width of a bit-field member, when the field is one.
    ///
    /// Only booleans and integers can be bit-fields; other types ignore an
    /// explicit bit length.
    fn bit_field_width(&self, field: &Field) -> Result<Option<u32>, GenerationError> {
        let Some(bits) = field.type_ref.bit_length else {
            return Ok(None);
        };
        if field.is_static || !field.is_single_valued() {
            return Ok(None);
        }
        match type_map::target(self.model, &field.type_ref)? {
            Target::Basic(basic) => match basic.kind() {
                PrimitiveKind::Boolean | PrimitiveKind::Integer { .. } => Ok(Some(bits)),
                _ => Ok(None),
            },
            Target::Declared(_) => Ok(None),
        }
    }

    /// Header stems a declaration needs to include, excluding `own`.
    ///
    /// Inner types are declared in their outer struct's header.
    fn project_includes<'r>(
        &self,
        own: &str,
        references: impl IntoIterator<Item = &'r TypeRef>,
    ) -> Result<BTreeSet<String>, GenerationError> {
        let mut includes = BTreeSet::new();
        for type_ref in references {
            if let Target::Declared(entry) = type_map::target(self.model, type_ref)? {
                let stem = match entry.outer {
                    Some(outer) => outer.name.to_string(),
                    None => entry.type_def.name().to_string(),
                };
                if stem != own {
                    includes.insert(stem);
                }
            }
        }
        Ok(includes)
    }

    /// Returns `true` if some struct derives from `entry`.
    fn is_extended(&self, entry: TypeEntry<'_>) -> bool {
        !self.model.derived_structs(entry.id).is_empty()
    }
}

/// C++ namespace of a declaration (`a::b`), if any.
///
/// An explicit struct namespace wins over the package; inner types use the
/// namespace of their outer struct.
pub fn namespace_of(entry: TypeEntry<'_>) -> Option<String> {
    let owner = entry.outer.or_else(|| entry.type_def.as_struct());
    let explicit = owner.and_then(|owner| owner.namespace.as_deref());
    let namespace = match explicit {
        Some(namespace) => normalize_namespace(namespace),
        None => entry
            .package
            .map(|package| normalize_namespace(&package.name.to_string()))
            .unwrap_or_default(),
    };
    if namespace.is_empty() {
        None
    } else {
        Some(namespace)
    }
}

/// Name of a declaration as written from inside namespace `from`.
pub fn qualified_name(entry: TypeEntry<'_>, from: Option<&str>) -> String {
    let local = match entry.outer {
        Some(outer) => format!("{}::{}", outer.name, entry.type_def.name()),
        None => entry.type_def.name().to_string(),
    };
    match namespace_of(entry) {
        Some(namespace) if Some(namespace.as_str()) != from => format!("{namespace}::{local}"),
        _ => local,
    }
}

fn open_namespace(out: &mut CodeWriter, namespace: Option<&str>) {
    if let Some(namespace) = namespace {
        out.line(format!("namespace {namespace} {{"));
        out.blank();
    }
}

fn close_namespace(out: &mut CodeWriter, namespace: Option<&str>) {
    if let Some(namespace) = namespace {
        out.line(format!("}}  // namespace {namespace}"));
        out.blank();
    }
}

/// `com.example` and `::com::example::` both become `com::example`.
fn normalize_namespace(namespace: &str) -> String {
    namespace
        .replace('.', "::")
        .split("::")
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}

fn header_path(entry: TypeEntry<'_>) -> String {
    format!("include/{}.h", entry.type_def.name())
}

fn source_path(entry: TypeEntry<'_>) -> String {
    format!("src/{}.cpp", entry.type_def.name())
}

fn test_path(entry: TypeEntry<'_>) -> String {
    format!("test/{}Test.cpp", entry.type_def.name())
}

fn getter_name(field: &Field) -> String {
    format!("get{}", capitalize(&field.name.to_string()))
}

fn setter_name(field: &Field) -> String {
    format!("set{}", capitalize(&field.name.to_string()))
}

/// Fields that get a synthesized getter/setter pair.
fn accessor_fields(struct_type: &StructType) -> impl Iterator<Item = &Field> {
    struct_type.instance_fields().filter(move |field| {
        field.is_single_valued()
            && !struct_type.has_method_named(&getter_name(field))
            && !struct_type.has_method_named(&setter_name(field))
    })
}

/// Returns `true` if an authored constructor takes no parameters.
fn has_authored_default_constructor(struct_type: &StructType) -> bool {
    struct_type
        .constructors
        .iter()
        .any(|constructor| constructor.parameters.is_empty())
}

/// Returns `true` if the synthesized all-fields constructor is emitted.
fn has_fields_constructor(struct_type: &StructType) -> bool {
    struct_type.constructors.is_empty() && struct_type.instance_fields().next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    use typeforge_core::model::{EnumerationType, Package, TypeId};

    #[test]
    fn test_normalize_namespace() {
        assert_eq!(normalize_namespace("com.example"), "com::example");
        assert_eq!(normalize_namespace("::app::model::"), "app::model");
        assert_eq!(normalize_namespace(""), "");
    }

    #[test]
    fn test_namespace_sources() {
        let model = Model::new()
            .with_type(StructType::new("Plain"))
            .with_type(StructType::new("Scoped").with_namespace("app.core"))
            .with_package(
                Package::new("com.example")
                    .with_type(StructType::new("Order").with_inner(EnumerationType::new("State"))),
            );

        let namespace = |id| model.entry(id).and_then(namespace_of);
        assert_eq!(namespace(TypeId::top_level(0)), None);
        assert_eq!(namespace(TypeId::top_level(1)).as_deref(), Some("app::core"));
        assert_eq!(
            namespace(TypeId::packaged(0, 0).with_inner(0)).as_deref(),
            Some("com::example")
        );
    }

    #[test]
    fn test_qualified_name_depends_on_namespace() {
        let model = Model::new().with_package(
            Package::new("shop")
                .with_type(StructType::new("Order").with_inner(EnumerationType::new("State"))),
        );
        let order = model.entry(TypeId::packaged(0, 0)).expect("entry");
        let state = model.entry(TypeId::packaged(0, 0).with_inner(0)).expect("entry");

        assert_eq!(qualified_name(order, Some("shop")), "Order");
        assert_eq!(qualified_name(order, None), "shop::Order");
        assert_eq!(qualified_name(state, Some("shop")), "Order::State");
        assert_eq!(qualified_name(state, Some("other")), "shop::Order::State");
    }
}
