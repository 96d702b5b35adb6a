//! Validation of a resolved model using the visitor pattern.
//!
//! This module implements a visitor-based (read-only) traversal of the
//! semantic model. It runs after scope resolution and before code
//! generation; every finding becomes a [`Diagnostic`].
//!
//! ## Validations Performed
//!
//! - **Uniqueness**: type names per scope (global, each package, each struct's
//!   inner types), primitive names per group, field names including inherited
//!   fields, enumerator names and explicit values
//! - **Acyclicity**: struct and enumeration `base` chains, alias and named
//!   array expansions
//! - **Ranges**: array sizes, explicit bit lengths, enumerator values,
//!   primitive lengths
//! - **Presence**: element types of named arrays, actual types of aliases,
//!   a zero-valued enumerator
//! - **Method modifiers**: combinations C++ rejects
//! - **Map keys**: integer, boolean or string primitives only
//! - **Style**: naming conventions and name length

mod naming;

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;

use typeforge_core::{
    identifier::Id,
    model::{
        ArrayType, BasicTypeId, Binding, Category, Encoding, EnumerationType, Enumerator, Field,
        Method, MethodModifier, Model, Package, PrimitiveKind, PrimitiveTypeDef, StructType,
        TypeAlias, TypeDef, TypeEntry, TypeId, TypeKind, TypeRef,
    },
};

use crate::error::{Diagnostic, Diagnostics, ErrorCode, Location};

/// Array sizes above this get a warning.
pub const MAX_ARRAY_SIZE: i64 = 10_000;

/// Widest explicit bit length accepted on a type reference.
pub const MAX_BIT_LENGTH: u32 = 64;

/// Primitive lengths above this get a warning.
pub const MAX_PRIMITIVE_LENGTH: u32 = 1024;

/// Largest enumerator value without a range warning.
pub const MAX_ENUMERATOR_VALUE: i64 = 65_535;

/// A naming scope in which type names must be unique.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Global,
    Package(&'a Package),
    /// Inner types of a struct.
    Struct(TypeEntry<'a>),
}

impl Scope<'_> {
    /// Qualified name of a type declared in this scope.
    pub fn qualify(&self, name: Id) -> Id {
        match self {
            Scope::Global => name,
            Scope::Package(package) => package.name.qualify(name),
            Scope::Struct(entry) => entry.qualified_name().qualify(name),
        }
    }
}

impl fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global scope"),
            Scope::Package(package) => write!(f, "package `{}`", package.name),
            Scope::Struct(entry) => write!(f, "struct `{}`", entry.qualified_name()),
        }
    }
}

/// Location of a declared type.
pub fn entry_location(entry: &TypeEntry<'_>) -> Location {
    Location::new(entry.qualified_name().to_string()).with_line(entry.type_def.line())
}

/// The declared type an alias or named array expands to, if any.
pub fn expansion_of(model: &Model, id: TypeId) -> Option<TypeId> {
    let target = match model.type_def(id)? {
        TypeDef::Alias(alias) => alias.actual_type.as_ref(),
        TypeDef::Array(array) => array.element_type.as_ref(),
        TypeDef::Struct(_) | TypeDef::Enumeration(_) => None,
    };
    target?.type_id()
}

/// Visitor trait for traversing the semantic model.
///
/// Default implementations perform recursive traversal so implementors can
/// override only the methods they care about. An override that still wants
/// the children visited calls the matching `walk_*` function.
pub trait Visitor<'a> {
    /// Visit a complete model
    fn visit_model(&mut self, model: &'a Model) {
        walk_model(self, model);
    }

    /// Visit a primitive type group
    fn visit_primitive_group(&mut self, group: &'a PrimitiveTypeDef) {
        for basic in &group.data_types {
            self.visit_basic_type(group, basic);
        }
    }

    /// Visit a single primitive type
    fn visit_basic_type(&mut self, _group: &'a PrimitiveTypeDef, _basic: &'a BasicTypeId) {}

    /// Visit a package declaration (its types are visited separately)
    fn visit_package(&mut self, _package: &'a Package) {}

    /// Visit the list of types declared in one scope
    fn visit_scope(&mut self, _scope: Scope<'a>, _types: &'a [TypeDef]) {}

    /// Visit a declared type
    fn visit_type_def(&mut self, entry: TypeEntry<'a>) {
        walk_type_def(self, entry);
    }

    /// Visit a struct
    fn visit_struct(&mut self, entry: TypeEntry<'a>, struct_type: &'a StructType) {
        walk_struct(self, entry, struct_type);
    }

    /// Visit a struct field
    fn visit_field(&mut self, owner: TypeEntry<'a>, field: &'a Field) {
        walk_field(self, owner, field);
    }

    /// Visit a struct method
    fn visit_method(&mut self, owner: TypeEntry<'a>, method: &'a Method) {
        walk_method(self, owner, method);
    }

    /// Visit an enumeration
    fn visit_enumeration(&mut self, entry: TypeEntry<'a>, enumeration: &'a EnumerationType) {
        for enumerator in &enumeration.enumerators {
            self.visit_enumerator(entry, enumerator);
        }
    }

    /// Visit an enumerator
    fn visit_enumerator(&mut self, _owner: TypeEntry<'a>, _enumerator: &'a Enumerator) {}

    /// Visit a named array type
    fn visit_array(&mut self, entry: TypeEntry<'a>, array: &'a ArrayType) {
        if let Some(element_type) = &array.element_type {
            self.visit_type_ref(entry, element_type, &entry_location(&entry));
        }
    }

    /// Visit a type alias
    fn visit_alias(&mut self, entry: TypeEntry<'a>, alias: &'a TypeAlias) {
        if let Some(actual_type) = &alias.actual_type {
            self.visit_type_ref(entry, actual_type, &entry_location(&entry));
        }
    }

    /// Visit a type reference site
    fn visit_type_ref(&mut self, _owner: TypeEntry<'a>, _type_ref: &'a TypeRef, _site: &Location) {}
}

/// Visits primitive groups, then top-level types, then each package.
pub fn walk_model<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, model: &'a Model) {
    for group in &model.primitive_definitions {
        visitor.visit_primitive_group(group);
    }

    visitor.visit_scope(Scope::Global, &model.types);
    for (index, type_def) in model.types.iter().enumerate() {
        visitor.visit_type_def(TypeEntry {
            id: TypeId::top_level(index),
            package: None,
            outer: None,
            type_def,
        });
    }

    for (package_index, package) in model.packages.iter().enumerate() {
        visitor.visit_package(package);
        visitor.visit_scope(Scope::Package(package), &package.types);
        for (index, type_def) in package.types.iter().enumerate() {
            visitor.visit_type_def(TypeEntry {
                id: TypeId::packaged(package_index, index),
                package: Some(package),
                outer: None,
                type_def,
            });
        }
    }
}

/// Dispatches on the variant of a declared type.
pub fn walk_type_def<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, entry: TypeEntry<'a>) {
    match entry.type_def {
        TypeDef::Struct(s) => visitor.visit_struct(entry, s),
        TypeDef::Enumeration(e) => visitor.visit_enumeration(entry, e),
        TypeDef::Array(a) => visitor.visit_array(entry, a),
        TypeDef::Alias(a) => visitor.visit_alias(entry, a),
    }
}

/// Visits fields, methods and (one level of) inner types.
pub fn walk_struct<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    entry: TypeEntry<'a>,
    struct_type: &'a StructType,
) {
    for field in &struct_type.fields {
        visitor.visit_field(entry, field);
    }
    for method in &struct_type.methods {
        visitor.visit_method(entry, method);
    }
    if entry.id.is_inner() {
        return;
    }
    visitor.visit_scope(Scope::Struct(entry), &struct_type.inner_types);
    for (index, type_def) in struct_type.inner_types.iter().enumerate() {
        visitor.visit_type_def(TypeEntry {
            id: entry.id.with_inner(index),
            package: entry.package,
            outer: Some(struct_type),
            type_def,
        });
    }
}

/// Visits the value type and, for map-like fields, the key type.
pub fn walk_field<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    owner: TypeEntry<'a>,
    field: &'a Field,
) {
    let site = entry_location(&owner).child(field.name).with_line(field.line);
    visitor.visit_type_ref(owner, &field.type_ref, &site);
    if let Some(key) = &field.key {
        visitor.visit_type_ref(owner, key, &site);
    }
}

/// Visits the return type and parameter types.
pub fn walk_method<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    owner: TypeEntry<'a>,
    method: &'a Method,
) {
    let site = entry_location(&owner).child(method.name).with_line(method.line);
    if let Some(returns) = &method.returns {
        visitor.visit_type_ref(owner, returns, &site);
    }
    for parameter in &method.parameters {
        visitor.visit_type_ref(owner, &parameter.type_ref, &site);
    }
}

/// Entry point for running a visitor on a model
pub fn visit_model<'a, V: Visitor<'a>>(visitor: &mut V, model: &'a Model) {
    visitor.visit_model(model)
}

/// Validator that checks every model invariant and style rule.
///
/// The validator never mutates the model and collects all diagnostics during
/// a single traversal.
pub struct Validator<'a> {
    model: &'a Model,
    diagnostics: Diagnostics,
    /// Member sets of cycles already reported.
    reported_cycles: HashSet<Vec<TypeId>>,
}

impl<'a> Validator<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            diagnostics: Diagnostics::new(),
            reported_cycles: HashSet::new(),
        }
    }

    /// Runs every rule and returns the diagnostics in traversal order.
    pub fn validate(mut self) -> Diagnostics {
        let model = self.model;
        visit_model(&mut self, model);
        debug!(
            errors = self.diagnostics.error_count(),
            warnings = self.diagnostics.warning_count();
            "Validation finished",
        );
        self.diagnostics
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    fn check_name_length(&mut self, what: &str, name: Id, location: &Location) {
        let length = name.char_len();
        if length > naming::MAX_NAME_LENGTH {
            self.emit(
                Diagnostic::warning(format!(
                    "{what} name `{name}` is {length} characters long (maximum {})",
                    naming::MAX_NAME_LENGTH
                ))
                .with_code(ErrorCode::E304)
                .with_location(location.clone()),
            );
        }
    }

    fn check_array_size(&mut self, size: i64, location: &Location) {
        if size <= 0 {
            self.emit(
                Diagnostic::error(format!("array size must be positive, found {size}"))
                    .with_code(ErrorCode::E208)
                    .with_location(location.clone()),
            );
        } else if size > MAX_ARRAY_SIZE {
            self.emit(
                Diagnostic::warning(format!(
                    "array size {size} is larger than {MAX_ARRAY_SIZE} elements"
                ))
                .with_code(ErrorCode::E209)
                .with_location(location.clone())
                .with_help("consider a dynamically sized sequence"),
            );
        }
    }

    /// Follows `step` from `entry` and reports a cycle through it once.
    ///
    /// A cycle is reported from its first member in traversal order; chains
    /// that merely lead into a cycle are left to the cycle's members.
    fn check_cycle(
        &mut self,
        entry: &TypeEntry<'a>,
        code: ErrorCode,
        step: fn(&Model, TypeId) -> Option<TypeId>,
    ) {
        let mut chain = vec![entry.id];
        let mut current = step(self.model, entry.id);
        while let Some(next) = current {
            if next == entry.id {
                let mut members = chain.clone();
                members.sort();
                if self.reported_cycles.insert(members) {
                    let path = chain
                        .iter()
                        .chain(std::iter::once(&entry.id))
                        .filter_map(|id| self.model.type_def(*id))
                        .map(|type_def| type_def.name().to_string())
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    let what = match code {
                        ErrorCode::E204 => "circular enumeration inheritance",
                        ErrorCode::E218 => "circular type definition",
                        _ => "circular struct inheritance",
                    };
                    self.emit(
                        Diagnostic::error(format!("{what}: {path}"))
                            .with_code(code)
                            .with_location(entry_location(entry)),
                    );
                }
                return;
            }
            if chain.contains(&next) {
                return;
            }
            chain.push(next);
            current = step(self.model, next);
        }
    }

    /// Reports a map key that is not an integer, boolean or string
    /// primitive. Aliases are followed; unresolved keys and alias cycles are
    /// reported elsewhere.
    fn check_map_key(&mut self, key: &'a TypeRef, location: &Location) {
        let model = self.model;
        let mut current = key;
        let mut visited = HashSet::new();
        let valid = loop {
            match current.binding {
                Binding::Basic(id) => {
                    break model
                        .basic_type(id)
                        .is_some_and(|basic| !matches!(basic.kind(), PrimitiveKind::Float { .. }));
                }
                Binding::Type(id) => {
                    if !visited.insert(id) {
                        return;
                    }
                    match model.type_def(id) {
                        Some(TypeDef::Alias(alias)) => match &alias.actual_type {
                            Some(actual_type) => current = actual_type,
                            None => return,
                        },
                        Some(_) => break false,
                        None => return,
                    }
                }
                Binding::Pending | Binding::Unresolved => return,
            }
        };

        if !valid {
            self.emit(
                Diagnostic::error(format!(
                    "map key `{}` must be an integer, boolean or string type",
                    key.name
                ))
                .with_code(ErrorCode::E219)
                .with_location(location.clone())
                .with_help("Protobuf map keys are limited to integral and string scalars"),
            );
        }
    }

    fn check_duplicate_fields(&mut self, entry: &TypeEntry<'a>, struct_type: &'a StructType) {
        let location = entry_location(entry);
        let mut seen = HashSet::new();
        for field in &struct_type.fields {
            if !seen.insert(field.name) {
                self.emit(
                    Diagnostic::error(format!(
                        "field `{}` is defined multiple times in `{}`",
                        field.name, struct_type.name
                    ))
                    .with_code(ErrorCode::E202)
                    .with_location(location.child(field.name).with_line(field.line)),
                );
            }
        }

        let model = self.model;
        let mut reported = HashSet::new();
        for ancestor in model.base_chain(entry.id) {
            let Some(base) = model.type_def(ancestor).and_then(TypeDef::as_struct) else {
                continue;
            };
            for field in &struct_type.fields {
                let inherited = base.fields.iter().any(|f| f.name == field.name);
                if inherited && reported.insert(field.name) {
                    self.emit(
                        Diagnostic::error(format!(
                            "field `{}` of `{}` duplicates a field inherited from `{}`",
                            field.name, struct_type.name, base.name
                        ))
                        .with_code(ErrorCode::E202)
                        .with_location(location.child(field.name).with_line(field.line))
                        .with_help("rename the field or remove it from one of the structs"),
                    );
                }
            }
        }
    }

    /// Returns `true` if `id` or an enumeration in its base chain has an
    /// enumerator with effective value zero.
    fn has_zero_enumerator(&self, id: TypeId, enumeration: &EnumerationType) -> bool {
        enumeration.has_zero()
            || self.model.base_chain(id).into_iter().any(|ancestor| {
                self.model
                    .type_def(ancestor)
                    .and_then(TypeDef::as_enumeration)
                    .is_some_and(EnumerationType::has_zero)
            })
    }
}

impl<'a> Visitor<'a> for Validator<'a> {
    fn visit_primitive_group(&mut self, group: &'a PrimitiveTypeDef) {
        let mut seen = HashSet::new();
        for basic in &group.data_types {
            if !seen.insert(basic.name) {
                self.emit(
                    Diagnostic::error(format!(
                        "primitive type `{}` is defined multiple times in group `{}`",
                        basic.name, group.name
                    ))
                    .with_code(ErrorCode::E201)
                    .with_location(Location::new(group.name.to_string()).with_line(basic.line)),
                );
            }
            self.visit_basic_type(group, basic);
        }
    }

    fn visit_basic_type(&mut self, group: &'a PrimitiveTypeDef, basic: &'a BasicTypeId) {
        let location = Location::new(group.name.qualify(basic.name).to_string()).with_line(basic.line);
        let Some(length) = basic.bit_length else {
            return;
        };

        if length > MAX_PRIMITIVE_LENGTH {
            self.emit(
                Diagnostic::warning(format!(
                    "primitive type `{}` has length {length}, above {MAX_PRIMITIVE_LENGTH} bits",
                    basic.name
                ))
                .with_code(ErrorCode::E305)
                .with_location(location.clone()),
            );
        }
        if basic.category == Category::String {
            self.emit(
                Diagnostic::info(format!(
                    "length {length} of string type `{}` is its maximum length",
                    basic.name
                ))
                .with_code(ErrorCode::E306)
                .with_location(location.clone()),
            );
        }
        if basic.encoding == Encoding::Ieee754 && length != 32 && length != 64 {
            self.emit(
                Diagnostic::warning(format!(
                    "IEEE754 type `{}` has length {length}; expected 32 or 64",
                    basic.name
                ))
                .with_code(ErrorCode::E307)
                .with_location(location),
            );
        }
    }

    fn visit_package(&mut self, package: &'a Package) {
        let location = Location::new(package.name.to_string()).with_line(package.line);
        let name = package.name.to_string();
        if name.is_empty() {
            self.emit(
                Diagnostic::error("package name must not be empty")
                    .with_code(ErrorCode::E217)
                    .with_location(location),
            );
        } else if !naming::is_package_name(&name) {
            self.emit(
                Diagnostic::warning(format!(
                    "package name `{name}` should be lowercase and dot separated"
                ))
                .with_code(ErrorCode::E302)
                .with_location(location)
                .with_help(format!("rename to `{}`", naming::suggest_package(&name))),
            );
        }
    }

    fn visit_scope(&mut self, scope: Scope<'a>, types: &'a [TypeDef]) {
        let mut seen = HashSet::new();
        for type_def in types {
            let name = type_def.name();
            if !seen.insert(name) {
                self.emit(
                    Diagnostic::error(format!(
                        "type `{name}` is defined multiple times in {scope}"
                    ))
                    .with_code(ErrorCode::E200)
                    .with_location(
                        Location::new(scope.qualify(name).to_string()).with_line(type_def.line()),
                    )
                    .with_help("remove the duplicate or use a different name"),
                );
            }
        }
    }

    fn visit_type_def(&mut self, entry: TypeEntry<'a>) {
        let location = entry_location(&entry);
        let name = entry.type_def.name();
        let text = name.to_string();
        if !naming::is_upper_camel_case(&text) {
            self.emit(
                Diagnostic::warning(format!(
                    "type name `{text}` should start with an uppercase letter"
                ))
                .with_code(ErrorCode::E301)
                .with_location(location.clone())
                .with_help(format!("rename to `{}`", naming::suggest_type(&text))),
            );
        }
        self.check_name_length("type", name, &location);

        walk_type_def(self, entry);
    }

    fn visit_struct(&mut self, entry: TypeEntry<'a>, struct_type: &'a StructType) {
        self.check_duplicate_fields(&entry, struct_type);
        self.check_cycle(&entry, ErrorCode::E203, Model::base_of);
        walk_struct(self, entry, struct_type);
    }

    fn visit_field(&mut self, owner: TypeEntry<'a>, field: &'a Field) {
        let location = entry_location(&owner).child(field.name).with_line(field.line);
        let text = field.name.to_string();
        if !naming::is_lower_camel_case(&text) {
            self.emit(
                Diagnostic::warning(format!(
                    "field name `{text}` should start with a lowercase letter"
                ))
                .with_code(ErrorCode::E300)
                .with_location(location.clone())
                .with_help(format!("rename to `{}`", naming::suggest_field(&text))),
            );
        }
        self.check_name_length("field", field.name, &location);

        if let Some(size) = field.array_size {
            self.check_array_size(size, &location);
        }
        if let Some(key) = &field.key {
            self.check_map_key(key, &location);
        }

        walk_field(self, owner, field);
    }

    fn visit_method(&mut self, owner: TypeEntry<'a>, method: &'a Method) {
        let location = entry_location(&owner).child(method.name).with_line(method.line);

        if method.has(MethodModifier::Static) {
            let conflicting: Vec<&str> = [
                (MethodModifier::Virtual, "virtual"),
                (MethodModifier::Const, "const"),
                (MethodModifier::Override, "override"),
                (MethodModifier::PureVirtual, "pure virtual"),
            ]
            .into_iter()
            .filter(|(modifier, _)| method.has(*modifier))
            .map(|(_, label)| label)
            .collect();
            if !conflicting.is_empty() {
                self.emit(
                    Diagnostic::error(format!(
                        "static method `{}` cannot be {}",
                        method.name,
                        conflicting.join(" or ")
                    ))
                    .with_code(ErrorCode::E215)
                    .with_location(location.clone()),
                );
            }
        }

        let has_base = owner
            .type_def
            .as_struct()
            .is_some_and(|s| s.base.is_some());
        if method.has(MethodModifier::Override) && !has_base {
            self.emit(
                Diagnostic::error(format!(
                    "method `{}` is marked override but `{}` has no base",
                    method.name,
                    owner.type_def.name()
                ))
                .with_code(ErrorCode::E216)
                .with_location(location),
            );
        }

        walk_method(self, owner, method);
    }

    fn visit_enumeration(&mut self, entry: TypeEntry<'a>, enumeration: &'a EnumerationType) {
        let location = entry_location(&entry);

        let mut names = HashSet::new();
        let mut values: HashMap<i64, Id> = HashMap::new();
        for enumerator in &enumeration.enumerators {
            let enumerator_location = location.child(enumerator.name).with_line(enumerator.line);
            if !names.insert(enumerator.name) {
                self.emit(
                    Diagnostic::error(format!(
                        "enumerator `{}` is defined multiple times in `{}`",
                        enumerator.name, enumeration.name
                    ))
                    .with_code(ErrorCode::E205)
                    .with_location(enumerator_location.clone()),
                );
            }

            let Some(value) = enumerator.value.as_ref().and_then(|v| v.as_integer()) else {
                continue;
            };
            if let Some(first) = values.get(&value) {
                self.emit(
                    Diagnostic::warning(format!(
                        "enumerator `{}` repeats value {value} of `{first}`",
                        enumerator.name
                    ))
                    .with_code(ErrorCode::E206)
                    .with_location(enumerator_location),
                );
            } else {
                values.insert(value, enumerator.name);
            }
        }

        if !self.has_zero_enumerator(entry.id, enumeration) {
            self.emit(
                Diagnostic::warning(format!(
                    "enumeration `{}` has no enumerator with value 0",
                    enumeration.name
                ))
                .with_code(ErrorCode::E207)
                .with_location(location)
                .with_help("Protobuf requires a zero value; an `_UNSPECIFIED` entry will be added"),
            );
        }

        self.check_cycle(&entry, ErrorCode::E204, Model::base_of);

        for enumerator in &enumeration.enumerators {
            self.visit_enumerator(entry, enumerator);
        }
    }

    fn visit_enumerator(&mut self, owner: TypeEntry<'a>, enumerator: &'a Enumerator) {
        let location = entry_location(&owner)
            .child(enumerator.name)
            .with_line(enumerator.line);
        let text = enumerator.name.to_string();
        if !naming::is_upper_case(&text) {
            self.emit(
                Diagnostic::warning(format!("enumerator name `{text}` should be upper case"))
                    .with_code(ErrorCode::E303)
                    .with_location(location.clone())
                    .with_help(format!("rename to `{}`", naming::suggest_enumerator(&text))),
            );
        }
        self.check_name_length("enumerator", enumerator.name, &location);

        let Some(value) = enumerator.value.as_ref().and_then(|v| v.as_integer()) else {
            return;
        };
        if !(0..=MAX_ENUMERATOR_VALUE).contains(&value) {
            self.emit(
                Diagnostic::warning(format!(
                    "enumerator `{}` has value {value} outside 0..={MAX_ENUMERATOR_VALUE}",
                    enumerator.name
                ))
                .with_code(ErrorCode::E214)
                .with_location(location),
            );
        }
    }

    fn visit_array(&mut self, entry: TypeEntry<'a>, array: &'a ArrayType) {
        let location = entry_location(&entry);
        match &array.element_type {
            Some(element_type) => self.visit_type_ref(entry, element_type, &location),
            None => self.emit(
                Diagnostic::error(format!("array type `{}` has no element type", array.name))
                    .with_code(ErrorCode::E212)
                    .with_location(location.clone()),
            ),
        }
        if let Some(size) = array.size {
            self.check_array_size(size, &location);
        }
        self.check_cycle(&entry, ErrorCode::E218, expansion_of);
    }

    fn visit_alias(&mut self, entry: TypeEntry<'a>, alias: &'a TypeAlias) {
        let location = entry_location(&entry);
        match &alias.actual_type {
            Some(actual_type) => self.visit_type_ref(entry, actual_type, &location),
            None => self.emit(
                Diagnostic::error(format!("type alias `{}` has no actual type", alias.name))
                    .with_code(ErrorCode::E213)
                    .with_location(location),
            ),
        }
        self.check_cycle(&entry, ErrorCode::E218, expansion_of);
    }

    fn visit_type_ref(&mut self, _owner: TypeEntry<'a>, type_ref: &'a TypeRef, site: &Location) {
        let Some(bits) = type_ref.bit_length else {
            return;
        };

        if bits == 0 || bits > MAX_BIT_LENGTH {
            self.emit(
                Diagnostic::error(format!(
                    "bit length {bits} of `{}` must be between 1 and {MAX_BIT_LENGTH}",
                    type_ref.name
                ))
                .with_code(ErrorCode::E210)
                .with_location(site.clone()),
            );
            return;
        }

        let kind = type_ref
            .type_id()
            .and_then(|id| self.model.type_def(id))
            .map(TypeDef::kind);
        if let Some(kind @ (TypeKind::Struct | TypeKind::Enumeration)) = kind {
            self.emit(
                Diagnostic::warning(format!(
                    "bit length applied to {kind} `{}`; only primitive types can be bit-packed",
                    type_ref.name
                ))
                .with_code(ErrorCode::E211)
                .with_location(site.clone()),
            );
        }
    }
}
