//! Semantic model types.
//!
//! The model is the tree handed over by the (external) parser: primitive type
//! groups, top-level types and packages. It owns every declaration. Type
//! references are stored as names and, after scope resolution, as integer
//! handles ([`TypeId`], [`BasicId`]) into this tree.
//!
//! # Pipeline Position
//!
//! ```text
//! Parsed Model (these types)
//!     ↓ scope resolution (bindings written into TypeRef)
//! Resolved Model
//!     ↓ validation (read-only)
//! Validated Model
//!     ↓ C++ generation  |  Protobuf generation
//! Generated Files
//! ```
//!
//! # Organization
//!
//! - [`primitive`] - Primitive type groups: [`PrimitiveTypeDef`], [`BasicTypeId`]
//! - [`types`] - Declared types: [`TypeDef`], [`StructType`], [`EnumerationType`], etc.
//! - [`reference`] - Type references and handles: [`TypeRef`], [`Binding`], [`TypeId`]
//! - [`expression`] - Default and enumerator value expressions: [`Expression`]

pub mod expression;
pub mod primitive;
pub mod reference;
pub mod types;

pub use expression::*;
pub use primitive::*;
pub use reference::*;
pub use types::*;

use serde::Deserialize;

use crate::identifier::Id;

/// Root of the semantic model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    /// Optional model name; used as the Protobuf file stem and C++ project name.
    #[serde(default)]
    pub name: Option<String>,

    /// Groups of primitive ("built-in") types, in declaration order.
    #[serde(default)]
    pub primitive_definitions: Vec<PrimitiveTypeDef>,

    /// Top-level types, in declaration order.
    #[serde(default)]
    pub types: Vec<TypeDef>,

    /// Packages, in declaration order.
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// A named group of types under a dotted package name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Package {
    pub name: Id,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl Package {
    /// Creates an empty package.
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            line: None,
        }
    }

    /// Adds a type to the package.
    pub fn with_type(mut self, type_def: impl Into<TypeDef>) -> Self {
        self.types.push(type_def.into());
        self
    }
}

/// A declared type together with its handle and enclosing package.
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry<'a> {
    pub id: TypeId,
    pub package: Option<&'a Package>,
    pub outer: Option<&'a StructType>,
    pub type_def: &'a TypeDef,
}

impl<'a> TypeEntry<'a> {
    /// Returns the fully qualified name of the entry (`pkg.Outer.Inner`).
    pub fn qualified_name(&self) -> Id {
        let mut scope = self.package.map(|package| package.name);
        if let Some(outer) = self.outer {
            scope = Some(match scope {
                Some(scope) => scope.qualify(outer.name),
                None => outer.name,
            });
        }
        match scope {
            Some(scope) => scope.qualify(self.type_def.name()),
            None => self.type_def.name(),
        }
    }
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a primitive type group.
    pub fn with_primitives(mut self, group: PrimitiveTypeDef) -> Self {
        self.primitive_definitions.push(group);
        self
    }

    /// Adds a top-level type.
    pub fn with_type(mut self, type_def: impl Into<TypeDef>) -> Self {
        self.types.push(type_def.into());
        self
    }

    /// Adds a package.
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    /// Dereferences a type handle.
    pub fn type_def(&self, id: TypeId) -> Option<&TypeDef> {
        let container = match id.package {
            Some(package) => &self.packages.get(package as usize)?.types,
            None => &self.types,
        };
        let type_def = container.get(id.index as usize)?;
        match id.inner {
            Some(inner) => type_def.as_struct()?.inner_types.get(inner as usize),
            None => Some(type_def),
        }
    }

    /// Dereferences a type handle and returns the enclosing package, if any.
    pub fn package_of(&self, id: TypeId) -> Option<&Package> {
        id.package.and_then(|package| self.packages.get(package as usize))
    }

    /// Dereferences a type handle to a full [`TypeEntry`].
    pub fn entry(&self, id: TypeId) -> Option<TypeEntry<'_>> {
        let type_def = self.type_def(id)?;
        let outer = match id.inner {
            Some(_) => self.type_def(id.outer())?.as_struct(),
            None => None,
        };
        Some(TypeEntry {
            id,
            package: self.package_of(id),
            outer,
            type_def,
        })
    }

    /// Dereferences a primitive type handle.
    pub fn basic_type(&self, id: BasicId) -> Option<&BasicTypeId> {
        self.primitive_definitions
            .get(id.group as usize)?
            .data_types
            .get(id.index as usize)
    }

    /// Iterates every primitive type with its handle, in declaration order.
    pub fn basic_types(&self) -> impl Iterator<Item = (BasicId, &BasicTypeId)> {
        self.primitive_definitions
            .iter()
            .enumerate()
            .flat_map(|(group, definition)| {
                definition
                    .data_types
                    .iter()
                    .enumerate()
                    .map(move |(index, basic)| (BasicId::new(group, index), basic))
            })
    }

    /// Iterates top-level and packaged types (not inner types), in declaration
    /// order: top-level types first, then each package in order.
    pub fn declared_types(&self) -> impl Iterator<Item = TypeEntry<'_>> {
        let top_level = self
            .types
            .iter()
            .enumerate()
            .map(|(index, type_def)| TypeEntry {
                id: TypeId::top_level(index),
                package: None,
                outer: None,
                type_def,
            });

        let packaged = self
            .packages
            .iter()
            .enumerate()
            .flat_map(|(package_index, package)| {
                package
                    .types
                    .iter()
                    .enumerate()
                    .map(move |(index, type_def)| TypeEntry {
                        id: TypeId::packaged(package_index, index),
                        package: Some(package),
                        outer: None,
                        type_def,
                    })
            });

        top_level.chain(packaged)
    }

    /// Iterates the inner types declared by structs, in declaration order.
    pub fn inner_types(&self) -> impl Iterator<Item = TypeEntry<'_>> {
        self.declared_types().flat_map(|entry| {
            let inner = entry
                .type_def
                .as_struct()
                .map(|outer| outer.inner_types.as_slice())
                .unwrap_or_default();
            inner
                .iter()
                .enumerate()
                .map(move |(index, type_def)| TypeEntry {
                    id: entry.id.with_inner(index),
                    package: entry.package,
                    outer: entry.type_def.as_struct(),
                    type_def,
                })
        })
    }

    /// Iterates every type: declared types followed by inner types.
    pub fn all_types(&self) -> impl Iterator<Item = TypeEntry<'_>> {
        self.declared_types().chain(self.inner_types())
    }

    /// Returns the handles of all structs whose `base` binds to `id`.
    pub fn derived_structs(&self, id: TypeId) -> Vec<TypeId> {
        self.all_types()
            .filter(|entry| {
                entry
                    .type_def
                    .as_struct()
                    .and_then(|s| s.base.as_ref())
                    .and_then(TypeRef::type_id)
                    == Some(id)
            })
            .map(|entry| entry.id)
            .collect()
    }

    /// Walks the `base` chain of a struct starting at its direct base.
    ///
    /// The walk stops before revisiting a declaration, so it terminates on
    /// cyclic chains.
    pub fn base_chain(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = self.base_of(id);
        while let Some(base) = current {
            if base == id || chain.contains(&base) {
                break;
            }
            chain.push(base);
            current = self.base_of(base);
        }
        chain
    }

    /// Returns the bound base of a struct or enumeration.
    pub fn base_of(&self, id: TypeId) -> Option<TypeId> {
        self.type_def(id)?.base()?.type_id()
    }

    /// Returns the model name or `fallback`.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}
