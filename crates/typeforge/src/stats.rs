//! Model statistics for the generation summary.

use std::fmt;

use typeforge_core::model::{Model, TypeDef};

/// Number of declarations per type kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub structs: usize,
    pub enumerations: usize,
    pub arrays: usize,
    pub aliases: usize,
}

impl KindCounts {
    fn of<'a>(types: impl IntoIterator<Item = &'a TypeDef>) -> Self {
        let mut counts = Self::default();
        for type_def in types {
            match type_def {
                TypeDef::Struct(_) => counts.structs += 1,
                TypeDef::Enumeration(_) => counts.enumerations += 1,
                TypeDef::Array(_) => counts.arrays += 1,
                TypeDef::Alias(_) => counts.aliases += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.structs + self.enumerations + self.arrays + self.aliases
    }
}

/// Counts of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStatistics {
    pub name: String,
    pub counts: KindCounts,
}

/// Shape of one top-level struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructSummary {
    pub name: String,
    pub fields: usize,
    pub base: Option<String>,
}

/// Counts describing a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatistics {
    pub name: Option<String>,
    /// Primitive types over all groups.
    pub primitive_types: usize,
    pub top_level: KindCounts,
    pub packages: Vec<PackageStatistics>,
    pub structs: Vec<StructSummary>,
}

impl ModelStatistics {
    pub fn collect(model: &Model) -> Self {
        let packages = model
            .packages
            .iter()
            .map(|package| PackageStatistics {
                name: package.name.to_string(),
                counts: KindCounts::of(&package.types),
            })
            .collect();

        let structs = model
            .types
            .iter()
            .filter_map(TypeDef::as_struct)
            .map(|struct_type| StructSummary {
                name: struct_type.name.to_string(),
                fields: struct_type.fields.len(),
                base: struct_type.base.as_ref().map(|base| base.name.to_string()),
            })
            .collect();

        Self {
            name: model.name.clone(),
            primitive_types: model
                .primitive_definitions
                .iter()
                .map(|group| group.data_types.len())
                .sum(),
            top_level: KindCounts::of(&model.types),
            packages,
            structs,
        }
    }

    /// Declared types across the model, top-level and packaged.
    pub fn total_types(&self) -> usize {
        self.top_level.total()
            + self
                .packages
                .iter()
                .map(|package| package.counts.total())
                .sum::<usize>()
    }
}

impl fmt::Display for ModelStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.name.as_deref().unwrap_or("(unnamed)"))?;
        writeln!(f, "Primitive types: {}", self.primitive_types)?;
        writeln!(f, "Packages: {}", self.packages.len())?;
        writeln!(f, "Top-level types: {}", self.top_level.total())?;
        write_counts(f, &self.top_level, "  ")?;

        if !self.packages.is_empty() {
            writeln!(f)?;
            writeln!(f, "Packages:")?;
            for package in &self.packages {
                writeln!(f, "  - {}:", package.name)?;
                write_counts(f, &package.counts, "      ")?;
            }
        }

        if !self.structs.is_empty() {
            writeln!(f)?;
            writeln!(f, "Struct details:")?;
            for summary in &self.structs {
                write!(f, "  - {} (fields: {}", summary.name, summary.fields)?;
                if let Some(base) = &summary.base {
                    write!(f, ", extends: {base}")?;
                }
                writeln!(f, ")")?;
            }
        }
        Ok(())
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &KindCounts, indent: &str) -> fmt::Result {
    writeln!(f, "{indent}Structs: {}", counts.structs)?;
    writeln!(f, "{indent}Enums: {}", counts.enumerations)?;
    writeln!(f, "{indent}Arrays: {}", counts.arrays)?;
    writeln!(f, "{indent}Typedefs: {}", counts.aliases)
}

#[cfg(test)]
mod tests {
    use super::*;

    use typeforge_core::model::{
        ArrayType, BasicTypeId, EnumerationType, Field, Package, PrimitiveTypeDef, StructType,
        TypeAlias,
    };

    fn sample() -> Model {
        Model::new()
            .with_name("shop")
            .with_primitives(
                PrimitiveTypeDef::new("Builtins")
                    .with(BasicTypeId::value("uint32", 32))
                    .with(BasicTypeId::string("string")),
            )
            .with_type(StructType::new("Entity").with_field(Field::new("id", "uint32")))
            .with_type(
                StructType::new("Customer")
                    .with_base("Entity")
                    .with_field(Field::new("name", "string")),
            )
            .with_type(TypeAlias::new("Name", "string"))
            .with_package(
                Package::new("billing")
                    .with_type(EnumerationType::new("Currency"))
                    .with_type(ArrayType::new("Amounts", "uint32")),
            )
    }

    #[test]
    fn test_collect_counts() {
        let stats = ModelStatistics::collect(&sample());

        assert_eq!(stats.primitive_types, 2);
        assert_eq!(
            stats.top_level,
            KindCounts {
                structs: 2,
                enumerations: 0,
                arrays: 0,
                aliases: 1,
            }
        );
        assert_eq!(stats.packages.len(), 1);
        assert_eq!(stats.packages[0].counts.enumerations, 1);
        assert_eq!(stats.packages[0].counts.arrays, 1);
        assert_eq!(stats.total_types(), 5);
        assert_eq!(stats.structs[1].base.as_deref(), Some("Entity"));
    }

    #[test]
    fn test_display_lists_details() {
        let text = ModelStatistics::collect(&sample()).to_string();

        assert!(text.starts_with("Model: shop\nPrimitive types: 2\nPackages: 1\n"));
        assert!(text.contains("  - billing:\n      Structs: 0\n      Enums: 1\n"));
        assert!(text.contains("  - Customer (fields: 1, extends: Entity)\n"));
        assert!(text.contains("  - Entity (fields: 1)\n"));
    }
}
