//! Protobuf schema generation.
//!
//! Emits one proto3 file per model with a `message` per struct and an
//! `enum` per enumeration. Arrays and aliases have no declaration of their
//! own; they are expanded where they are used.
//!
//! Package mapping: a model with exactly one package uses it as the file
//! `package`. Otherwise the configured default package (if any) is used and
//! every package becomes a wrapper message named after it in upper camel
//! case, so `com.example.Person` is referenced as `ComExample.Person`. A
//! single package is wrapped too when one of its messages or enums shares a
//! name with a top-level one.
//!
//! Enum values share the scope of their enum, so every enumerator is
//! prefixed with the enum name in constant case (`Color.RED` becomes
//! `COLOR_RED`) unless it already carries that prefix.

mod descriptor;
mod writer;

pub use descriptor::DescriptorRequest;

use std::collections::HashSet;

use convert_case::{Case, Casing};
use log::{debug, info, trace};

use typeforge_core::{
    identifier::Id,
    model::{Model, TypeDef, TypeEntry, TypeRef},
};

use crate::{
    config::ProtoConfig,
    error::GenerationError,
    output::GeneratedFiles,
    text::sanitize_identifier,
    type_map::{self, MAX_ALIAS_DEPTH, Target},
};

const INDENT: &str = "  ";

/// Generates the `.proto` file for a model.
pub struct ProtoGenerator<'a> {
    model: &'a Model,
    config: &'a ProtoConfig,
}

impl<'a> ProtoGenerator<'a> {
    pub fn new(model: &'a Model, config: &'a ProtoConfig) -> Self {
        Self { model, config }
    }

    /// File name of the schema: configured stem, model name, or `model`.
    pub fn file_name(&self) -> String {
        let stem = self
            .config
            .file_stem()
            .unwrap_or_else(|| self.model.name_or("model"));
        format!("{}.proto", sanitize_identifier(stem))
    }

    /// The `package` statement of the file, if any.
    pub fn file_package(&self) -> Option<String> {
        match self.model.packages.as_slice() {
            [package] if !self.wraps_packages() => Some(package.name.to_string()),
            _ => self.config.default_package().map(str::to_string),
        }
    }

    /// Generates the schema, keyed by [`file_name`](Self::file_name).
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the model contains a reference that
    /// scope resolution did not bind.
    pub fn generate(&self) -> Result<GeneratedFiles, GenerationError> {
        let file_name = self.file_name();
        info!(file = file_name; "Generating Protobuf schema");

        let content = writer::schema(self)?;

        let mut files = GeneratedFiles::new();
        files.insert(file_name, content);
        debug!("Protobuf generation finished");
        Ok(files)
    }

    fn model(&self) -> &'a Model {
        self.model
    }

    /// Packages become wrapper messages unless there is exactly one whose
    /// declarations do not clash with top-level ones.
    fn wraps_packages(&self) -> bool {
        match self.model.packages.as_slice() {
            [] => false,
            [package] => {
                let top_level: HashSet<Id> = self
                    .model
                    .types
                    .iter()
                    .filter(|type_def| writer::is_declared(type_def))
                    .map(TypeDef::name)
                    .collect();
                let clash = package
                    .types
                    .iter()
                    .filter(|type_def| writer::is_declared(type_def))
                    .find(|type_def| top_level.contains(&type_def.name()));
                if let Some(type_def) = clash {
                    debug!(
                        name:% = type_def.name(),
                        package:% = package.name;
                        "Top-level declaration clashes with package, wrapping it",
                    );
                }
                clash.is_some()
            }
            _ => true,
        }
    }

    /// Name of a struct or enumeration as referenced from anywhere in the
    /// file: `[Wrapper.][Outer.]Name`.
    fn declaration_name(&self, entry: TypeEntry<'_>) -> String {
        let mut segments = Vec::new();
        if self.wraps_packages() {
            if let Some(package) = entry.package {
                segments.push(wrapper_name(package.name));
            }
        }
        if let Some(outer) = entry.outer {
            segments.push(outer.name.to_string());
        }
        segments.push(entry.type_def.name().to_string());
        segments.join(".")
    }

    /// Maps a reference to its proto type, expanding aliases and arrays.
    fn field_type(&self, type_ref: &TypeRef) -> Result<FieldType, GenerationError> {
        let mut current = type_ref;
        let mut repeated = false;
        for _ in 0..MAX_ALIAS_DEPTH {
            let next = match type_map::target(self.model, current)? {
                Target::Basic(basic) => {
                    return Ok(FieldType::new(type_map::proto_scalar(basic.kind()), repeated));
                }
                Target::Declared(entry) => match entry.type_def {
                    TypeDef::Struct(_) | TypeDef::Enumeration(_) => {
                        return Ok(FieldType::new(self.declaration_name(entry), repeated));
                    }
                    TypeDef::Alias(alias) => alias.actual_type.as_ref(),
                    TypeDef::Array(array) => {
                        if repeated {
                            debug!(name:% = array.name; "Collapsing nested repeated type");
                        }
                        repeated = true;
                        array.element_type.as_ref()
                    }
                },
            };
            match next {
                Some(next) => {
                    trace!(from:% = current.name, to:% = next.name; "Expanding type");
                    current = next;
                }
                None => {
                    return Err(GenerationError::UnresolvedReference { name: current.name });
                }
            }
        }
        Err(GenerationError::UnresolvedReference {
            name: type_ref.name,
        })
    }
}

/// A mapped field type. Proto3 has no nested repetition, so any number of
/// array levels collapse into one `repeated` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldType {
    name: String,
    repeated: bool,
}

impl FieldType {
    fn new(name: impl Into<String>, repeated: bool) -> Self {
        Self {
            name: name.into(),
            repeated,
        }
    }
}

/// Wrapper message name of a package: `com.example` becomes `ComExample`.
pub fn wrapper_name(package: Id) -> String {
    package.to_string().replace('.', "_").to_case(Case::UpperCamel)
}

/// Enumerator name as written to the schema: `Color` and `RED` become
/// `COLOR_RED`, while `COLOR_RED` stays as it is.
pub fn enumerator_name(enumeration: Id, enumerator: Id) -> String {
    let prefix = enumeration.to_string().to_case(Case::Constant);
    let name = enumerator.to_string();
    if name
        .strip_prefix(prefix.as_str())
        .is_some_and(|rest| rest.starts_with('_'))
    {
        name
    } else {
        format!("{prefix}_{name}")
    }
}

/// Name of the zero enumerator synthesized for an enumeration without one:
/// `OrderStatus` becomes `ORDER_STATUS_UNSPECIFIED`.
pub fn unspecified_name(enumeration: Id) -> String {
    format!("{}_UNSPECIFIED", enumeration.to_string().to_case(Case::Constant))
}

#[cfg(test)]
mod tests {
    use super::*;

    use typeforge_core::model::{
        ArrayType, BasicId, BasicTypeId, Binding, Package, PrimitiveTypeDef, StructType,
        TypeAlias, TypeId,
    };

    fn bound(name: &str, binding: Binding) -> TypeRef {
        let mut type_ref = TypeRef::new(name);
        type_ref.binding = binding;
        type_ref
    }

    #[test]
    fn test_wrapper_and_unspecified_names() {
        assert_eq!(wrapper_name(Id::new("com.example")), "ComExample");
        assert_eq!(wrapper_name(Id::new("shapes")), "Shapes");
        assert_eq!(unspecified_name(Id::new("OrderStatus")), "ORDER_STATUS_UNSPECIFIED");
        assert_eq!(unspecified_name(Id::new("Color")), "COLOR_UNSPECIFIED");
    }

    #[test]
    fn test_enumerator_names_are_scoped_by_enum() {
        assert_eq!(enumerator_name(Id::new("Color"), Id::new("RED")), "COLOR_RED");
        assert_eq!(enumerator_name(Id::new("Color"), Id::new("COLOR_RED")), "COLOR_RED");
        assert_eq!(enumerator_name(Id::new("Color"), Id::new("COLORFUL")), "COLOR_COLORFUL");
        assert_eq!(
            enumerator_name(Id::new("OrderStatus"), Id::new("OPEN")),
            "ORDER_STATUS_OPEN"
        );
    }

    #[test]
    fn test_file_name_precedence() {
        let model = Model::new().with_name("people");
        let config = ProtoConfig::default();
        assert_eq!(ProtoGenerator::new(&model, &config).file_name(), "people.proto");

        let config = ProtoConfig::default().with_file_stem("schema");
        assert_eq!(ProtoGenerator::new(&model, &config).file_name(), "schema.proto");

        let unnamed = Model::new();
        let config = ProtoConfig::default();
        assert_eq!(ProtoGenerator::new(&unnamed, &config).file_name(), "model.proto");
    }

    #[test]
    fn test_file_package_mapping() {
        let config = ProtoConfig::default().with_default_package("acme");

        let single = Model::new().with_package(Package::new("com.example"));
        let generator = ProtoGenerator::new(&single, &config);
        assert_eq!(generator.file_package().as_deref(), Some("com.example"));
        assert!(!generator.wraps_packages());

        let double = Model::new()
            .with_package(Package::new("a"))
            .with_package(Package::new("b"));
        let generator = ProtoGenerator::new(&double, &config);
        assert_eq!(generator.file_package().as_deref(), Some("acme"));
        assert!(generator.wraps_packages());

        let clashing = Model::new()
            .with_type(StructType::new("Data"))
            .with_package(Package::new("pkg").with_type(StructType::new("Data")));
        let generator = ProtoGenerator::new(&clashing, &config);
        assert!(generator.wraps_packages());
        assert_eq!(generator.file_package().as_deref(), Some("acme"));

        let aliased = Model::new()
            .with_type(TypeAlias::new("Data", "Other"))
            .with_package(Package::new("pkg").with_type(StructType::new("Data")));
        assert!(!ProtoGenerator::new(&aliased, &config).wraps_packages());
    }

    #[test]
    fn test_field_type_expands_aliases_and_arrays() {
        let mut model = Model::new()
            .with_primitives(PrimitiveTypeDef::new("core").with(BasicTypeId::value("uint64", 64)))
            .with_type(TypeAlias::new("Counter", "uint64"))
            .with_type(ArrayType::new("Counters", "Counter"))
            .with_type(ArrayType::new("Grid", "Counters"));

        let uint64 = Binding::Basic(BasicId::new(0, 0));
        model.types[0] = TypeAlias {
            actual_type: Some(bound("uint64", uint64)),
            ..TypeAlias::new("Counter", "uint64")
        }
        .into();
        model.types[1] = ArrayType {
            element_type: Some(bound("Counter", Binding::Type(TypeId::top_level(0)))),
            ..ArrayType::new("Counters", "Counter")
        }
        .into();
        model.types[2] = ArrayType {
            element_type: Some(bound("Counters", Binding::Type(TypeId::top_level(1)))),
            ..ArrayType::new("Grid", "Counters")
        }
        .into();

        let config = ProtoConfig::default();
        let generator = ProtoGenerator::new(&model, &config);

        let alias = bound("Counter", Binding::Type(TypeId::top_level(0)));
        assert_eq!(
            generator.field_type(&alias).expect("alias"),
            FieldType::new("int64", false)
        );
        let grid = bound("Grid", Binding::Type(TypeId::top_level(2)));
        assert_eq!(
            generator.field_type(&grid).expect("grid"),
            FieldType::new("int64", true)
        );
    }

    #[test]
    fn test_declaration_name_qualifies_wrappers_and_outers() {
        let model = Model::new()
            .with_package(
                Package::new("com.example")
                    .with_type(StructType::new("Order").with_inner(StructType::new("Line"))),
            )
            .with_package(Package::new("other"));
        let config = ProtoConfig::default();
        let generator = ProtoGenerator::new(&model, &config);

        let order = model.entry(TypeId::packaged(0, 0)).expect("order");
        assert_eq!(generator.declaration_name(order), "ComExample.Order");
        let line = model
            .entry(TypeId::packaged(0, 0).with_inner(0))
            .expect("line");
        assert_eq!(generator.declaration_name(line), "ComExample.Order.Line");
    }

    #[test]
    fn test_field_type_rejects_unresolved() {
        let model = Model::new();
        let config = ProtoConfig::default();
        let generator = ProtoGenerator::new(&model, &config);
        let err = generator
            .field_type(&TypeRef::new("Missing"))
            .expect_err("pending reference");
        assert!(matches!(err, GenerationError::UnresolvedReference { .. }));
    }
}
