//! Scope resolution: binds every type reference of a model to a declaration.
//!
//! Three namespaces are built once per model and queried in this order:
//!
//! 1. **Primitives**: every [`BasicTypeId`] of every primitive group, by simple name.
//! 2. **Global**: every top-level type, by simple name.
//! 3. **Declared**: packaged types under their simple and dotted names, then
//!    inner types under their simple, `Outer.Inner` and dotted names.
//!
//! Within each namespace the first registration of a name wins. A simple
//! name registered by several packages binds to the first declaration and
//! produces an [`ErrorCode::E101`] warning listing every candidate.
//!
//! `base` references use a kind-restricted view: a struct may only extend a
//! struct and an enumeration only an enumeration, never the referencing
//! declaration itself. Every other reference site uses the unrestricted view.
//!
//! Resolution is best effort: an unknown name produces an
//! [`ErrorCode::E100`] diagnostic and an [`Binding::Unresolved`] marker, and
//! resolution continues with the next reference.
//!
//! [`BasicTypeId`]: typeforge_core::model::BasicTypeId

use indexmap::IndexMap;
use log::{debug, trace, warn};

use typeforge_core::{
    identifier::Id,
    model::{BasicId, Binding, Model, TypeDef, TypeId, TypeKind, TypeRef},
};

use crate::error::{Diagnostic, Diagnostics, ErrorCode, Location};

/// A declared type registered in a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    id: TypeId,
    kind: TypeKind,
    qualified: Id,
}

impl Candidate {
    fn is_global(&self) -> bool {
        self.id.package.is_none() && !self.id.is_inner()
    }
}

/// Result of an unrestricted lookup.
#[derive(Debug)]
enum Lookup {
    Basic(BasicId),
    Type(Candidate),
    Ambiguous {
        chosen: Candidate,
        candidates: Vec<Candidate>,
    },
    Missing,
}

/// Result of a kind-restricted `base` lookup.
#[derive(Debug)]
enum BaseLookup {
    Found(Candidate),
    Ambiguous {
        chosen: Candidate,
        candidates: Vec<Candidate>,
    },
    /// The name exists but no declaration of the right kind (other than the
    /// referencing one) carries it.
    Invalid(String),
    Missing,
}

/// The three namespaces of a model.
#[derive(Debug, Default)]
struct Namespace {
    primitives: IndexMap<Id, BasicId>,
    global: IndexMap<Id, Candidate>,
    declared: IndexMap<Id, Vec<Candidate>>,
}

impl Namespace {
    fn build(model: &Model) -> Self {
        let mut namespace = Self::default();

        for (id, basic) in model.basic_types() {
            namespace.primitives.entry(basic.name).or_insert(id);
        }

        for entry in model.all_types() {
            let simple = entry.type_def.name();
            let candidate = Candidate {
                id: entry.id,
                kind: entry.type_def.kind(),
                qualified: entry.qualified_name(),
            };

            if candidate.is_global() {
                namespace.global.entry(simple).or_insert(candidate);
                continue;
            }

            namespace.register(simple, candidate);
            if let Some(outer) = entry.outer {
                namespace.register(outer.name.qualify(simple), candidate);
            }
            namespace.register(candidate.qualified, candidate);
        }

        trace!(
            primitives = namespace.primitives.len(),
            global = namespace.global.len(),
            declared = namespace.declared.len();
            "Namespaces built",
        );
        namespace
    }

    fn register(&mut self, name: Id, candidate: Candidate) {
        let candidates = self.declared.entry(name).or_default();
        if !candidates.iter().any(|c| c.id == candidate.id) {
            candidates.push(candidate);
        }
    }

    fn lookup(&self, name: Id) -> Lookup {
        if let Some(&basic) = self.primitives.get(&name) {
            return Lookup::Basic(basic);
        }
        if let Some(&candidate) = self.global.get(&name) {
            return Lookup::Type(candidate);
        }
        match self.declared.get(&name).map(Vec::as_slice) {
            Some([only]) => Lookup::Type(*only),
            Some(candidates @ [first, ..]) => Lookup::Ambiguous {
                chosen: *first,
                candidates: candidates.to_vec(),
            },
            _ => Lookup::Missing,
        }
    }

    fn lookup_base(&self, name: Id, kind: TypeKind, referrer: TypeId) -> BaseLookup {
        let all: Vec<Candidate> = self
            .global
            .get(&name)
            .copied()
            .into_iter()
            .chain(self.declared.get(&name).into_iter().flatten().copied())
            .collect();

        let valid: Vec<Candidate> = all
            .iter()
            .filter(|candidate| candidate.kind == kind && candidate.id != referrer)
            .copied()
            .collect();

        match valid.as_slice() {
            [] => {
                if all.iter().any(|candidate| candidate.id == referrer) && all.len() == 1 {
                    BaseLookup::Invalid(format!("`{name}` refers to the declaration itself"))
                } else if let Some(other) = all.iter().find(|c| c.id != referrer) {
                    BaseLookup::Invalid(format!(
                        "`{name}` is {} {}, expected {} {kind}",
                        article(other.kind),
                        other.kind,
                        article(kind)
                    ))
                } else if self.primitives.contains_key(&name) {
                    BaseLookup::Invalid(format!(
                        "`{name}` is a primitive type, expected {} {kind}",
                        article(kind)
                    ))
                } else {
                    BaseLookup::Missing
                }
            }
            [only] => BaseLookup::Found(*only),
            [first, ..] if first.is_global() => BaseLookup::Found(*first),
            [first, ..] => BaseLookup::Ambiguous {
                chosen: *first,
                candidates: valid.clone(),
            },
        }
    }
}

fn article(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Enumeration | TypeKind::Array | TypeKind::Alias => "an",
        TypeKind::Struct => "a",
    }
}

/// Resolves every type reference of a model in place.
///
/// # Example
///
/// ```
/// # use typeforge_core::model::{BasicTypeId, Field, Model, PrimitiveTypeDef, StructType};
/// # use typeforge_sema::ScopeResolver;
///
/// let mut model = Model::new()
///     .with_primitives(PrimitiveTypeDef::new("Builtins").with(BasicTypeId::value("uint32", 32)))
///     .with_type(StructType::new("Person").with_field(Field::new("age", "uint32")));
///
/// let diagnostics = ScopeResolver::new(&model).resolve(&mut model);
///
/// assert!(diagnostics.is_empty());
/// let age = &model.types[0].as_struct().unwrap().fields[0];
/// assert!(age.type_ref.basic_id().is_some());
/// ```
#[derive(Debug)]
pub struct ScopeResolver {
    namespace: Namespace,
    diagnostics: Diagnostics,
    bound: usize,
    unresolved: usize,
}

impl ScopeResolver {
    /// Builds the namespaces of `model`.
    pub fn new(model: &Model) -> Self {
        Self {
            namespace: Namespace::build(model),
            diagnostics: Diagnostics::new(),
            bound: 0,
            unresolved: 0,
        }
    }

    /// Resolves every reference site of `model` and returns the diagnostics.
    ///
    /// `model` must be the model the resolver was built from.
    pub fn resolve(mut self, model: &mut Model) -> Diagnostics {
        for (index, type_def) in model.types.iter_mut().enumerate() {
            let location = Location::new(type_def.name().to_string()).with_line(type_def.line());
            self.resolve_type_def(type_def, TypeId::top_level(index), &location);
        }

        for (package_index, package) in model.packages.iter_mut().enumerate() {
            let package_name = package.name;
            for (index, type_def) in package.types.iter_mut().enumerate() {
                let location = Location::new(package_name.qualify(type_def.name()).to_string())
                    .with_line(type_def.line());
                self.resolve_type_def(type_def, TypeId::packaged(package_index, index), &location);
            }
        }

        debug!(
            bound = self.bound,
            unresolved = self.unresolved;
            "Scope resolution finished",
        );
        self.diagnostics
    }

    fn resolve_type_def(&mut self, type_def: &mut TypeDef, id: TypeId, location: &Location) {
        match type_def {
            TypeDef::Struct(s) => {
                let name = s.name;
                if let Some(base) = s.base.as_mut() {
                    self.bind_base(base, TypeKind::Struct, id, location);
                }
                for field in &mut s.fields {
                    let field_location = location.child(field.name).with_line(field.line);
                    self.bind(&mut field.type_ref, &field_location);
                    if let Some(key) = field.key.as_mut() {
                        self.bind(key, &field_location);
                    }
                }
                for method in &mut s.methods {
                    let method_location = location.child(method.name).with_line(method.line);
                    if let Some(returns) = method.returns.as_mut() {
                        self.bind(returns, &method_location);
                    }
                    for parameter in &mut method.parameters {
                        self.bind(&mut parameter.type_ref, &method_location);
                    }
                }
                for constructor in &mut s.constructors {
                    let constructor_location = location.child(name).with_line(constructor.line);
                    for parameter in &mut constructor.parameters {
                        self.bind(&mut parameter.type_ref, &constructor_location);
                    }
                }
                if id.is_inner() {
                    if !s.inner_types.is_empty() {
                        warn!(
                            type_name:% = name;
                            "Inner types nested more than one level deep are not resolved",
                        );
                    }
                    return;
                }
                for (index, inner) in s.inner_types.iter_mut().enumerate() {
                    let inner_location = location.child(inner.name()).with_line(inner.line());
                    self.resolve_type_def(inner, id.with_inner(index), &inner_location);
                }
            }
            TypeDef::Enumeration(e) => {
                if let Some(base) = e.base.as_mut() {
                    self.bind_base(base, TypeKind::Enumeration, id, location);
                }
            }
            TypeDef::Array(a) => {
                if let Some(element_type) = a.element_type.as_mut() {
                    self.bind(element_type, location);
                }
            }
            TypeDef::Alias(a) => {
                if let Some(actual_type) = a.actual_type.as_mut() {
                    self.bind(actual_type, location);
                }
            }
        }
    }

    fn bind(&mut self, type_ref: &mut TypeRef, location: &Location) {
        let name = type_ref.name;
        type_ref.binding = match self.namespace.lookup(name) {
            Lookup::Basic(id) => Binding::Basic(id),
            Lookup::Type(candidate) => Binding::Type(candidate.id),
            Lookup::Ambiguous { chosen, candidates } => {
                self.report_ambiguous(name, chosen, &candidates, location);
                Binding::Type(chosen.id)
            }
            Lookup::Missing => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("undefined type `{name}`"))
                        .with_code(ErrorCode::E100)
                        .with_location(location.clone())
                        .with_help(format!(
                            "declare `{name}` as a primitive or a type, or fix the spelling"
                        )),
                );
                Binding::Unresolved
            }
        };
        self.record(type_ref);
    }

    fn bind_base(&mut self, base: &mut TypeRef, kind: TypeKind, referrer: TypeId, location: &Location) {
        let name = base.name;
        base.binding = match self.namespace.lookup_base(name, kind, referrer) {
            BaseLookup::Found(candidate) => Binding::Type(candidate.id),
            BaseLookup::Ambiguous { chosen, candidates } => {
                self.report_ambiguous(name, chosen, &candidates, location);
                Binding::Type(chosen.id)
            }
            BaseLookup::Invalid(reason) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("invalid base type: {reason}"))
                        .with_code(ErrorCode::E102)
                        .with_location(location.clone())
                        .with_help(format!("{} {kind} may only extend another {kind}", article(kind))),
                );
                Binding::Unresolved
            }
            BaseLookup::Missing => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("undefined base type `{name}`"))
                        .with_code(ErrorCode::E100)
                        .with_location(location.clone()),
                );
                Binding::Unresolved
            }
        };
        self.record(base);
    }

    fn report_ambiguous(
        &mut self,
        name: Id,
        chosen: Candidate,
        candidates: &[Candidate],
        location: &Location,
    ) {
        let listed = candidates
            .iter()
            .map(|candidate| format!("`{}`", candidate.qualified))
            .collect::<Vec<_>>()
            .join(", ");
        let mut diagnostic = Diagnostic::warning(format!(
            "ambiguous type `{name}` resolved to `{}`; candidates are {listed}",
            chosen.qualified
        ))
        .with_code(ErrorCode::E101)
        .with_location(location.clone());
        if let Some(other) = candidates.iter().find(|candidate| candidate.id != chosen.id) {
            diagnostic = diagnostic.with_help(format!(
                "use a qualified name such as `{}`",
                other.qualified
            ));
        }
        self.diagnostics.emit(diagnostic);
    }

    fn record(&mut self, type_ref: &TypeRef) {
        trace!(name:% = type_ref.name, binding:? = type_ref.binding; "Reference bound");
        if type_ref.binding.is_resolved() {
            self.bound += 1;
        } else {
            self.unresolved += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use typeforge_core::model::{
        ArrayType, BasicTypeId, EnumerationType, Field, Method, Package, Parameter,
        PrimitiveTypeDef, StructType, TypeAlias,
    };

    use super::*;

    fn builtins() -> PrimitiveTypeDef {
        PrimitiveTypeDef::new("Builtins")
            .with(BasicTypeId::value("uint32", 32))
            .with(BasicTypeId::string("string"))
    }

    fn resolve(model: &mut Model) -> Diagnostics {
        ScopeResolver::new(model).resolve(model)
    }

    fn field_binding(model: &Model, type_index: usize, field_index: usize) -> Binding {
        model.types[type_index]
            .as_struct()
            .expect("struct")
            .fields[field_index]
            .type_ref
            .binding
    }

    #[test]
    fn test_binds_primitive_and_global() {
        let mut model = Model::new()
            .with_primitives(builtins())
            .with_type(
                StructType::new("Person")
                    .with_field(Field::new("name", "string"))
                    .with_field(Field::new("address", "Address")),
            )
            .with_type(StructType::new("Address"));

        let diagnostics = resolve(&mut model);

        assert!(diagnostics.is_empty());
        assert_eq!(field_binding(&model, 0, 0), Binding::Basic(BasicId::new(0, 1)));
        assert_eq!(field_binding(&model, 0, 1), Binding::Type(TypeId::top_level(1)));
    }

    #[test]
    fn test_primitive_wins_over_global() {
        let mut model = Model::new()
            .with_primitives(builtins())
            .with_type(StructType::new("string"))
            .with_type(StructType::new("User").with_field(Field::new("name", "string")));

        resolve(&mut model);

        assert_eq!(field_binding(&model, 1, 0), Binding::Basic(BasicId::new(0, 1)));
    }

    #[test]
    fn test_undefined_type_reported_and_marked() {
        let mut model = Model::new()
            .with_primitives(builtins())
            .with_type(
                StructType::new("Person")
                    .with_field(Field::new("address", "Adress").with_line(4))
                    .with_field(Field::new("age", "uint32")),
            );

        let diagnostics = resolve(&mut model);

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.code(), Some(ErrorCode::E100));
        assert_eq!(diagnostic.message(), "undefined type `Adress`");
        assert_eq!(
            diagnostic.location().map(Location::path),
            Some("Person.address")
        );
        assert_eq!(field_binding(&model, 0, 0), Binding::Unresolved);
        // Resolution continues past the failure.
        assert!(field_binding(&model, 0, 1).is_resolved());
    }

    #[test]
    fn test_qualified_and_simple_package_names() {
        let mut model = Model::new()
            .with_package(Package::new("com.shop").with_type(StructType::new("Item")))
            .with_type(
                StructType::new("Cart")
                    .with_field(Field::new("first", "Item"))
                    .with_field(Field::new("second", "com.shop.Item")),
            );

        let diagnostics = resolve(&mut model);

        assert!(diagnostics.is_empty());
        assert_eq!(field_binding(&model, 0, 0), Binding::Type(TypeId::packaged(0, 0)));
        assert_eq!(field_binding(&model, 0, 1), Binding::Type(TypeId::packaged(0, 0)));
    }

    #[test]
    fn test_ambiguous_simple_name_binds_first_and_warns() {
        let mut model = Model::new()
            .with_package(Package::new("a").with_type(StructType::new("Item")))
            .with_package(Package::new("b").with_type(StructType::new("Item")))
            .with_type(StructType::new("Holder").with_field(Field::new("item", "Item")));

        let diagnostics = resolve(&mut model);

        assert_eq!(field_binding(&model, 0, 0), Binding::Type(TypeId::packaged(0, 0)));
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.code(), Some(ErrorCode::E101));
        assert!(diagnostic.severity().is_warning());
        assert!(diagnostic.message().contains("`a.Item`"));
        assert!(diagnostic.message().contains("`b.Item`"));
        assert_eq!(diagnostic.help(), Some("use a qualified name such as `b.Item`"));
    }

    #[test]
    fn test_qualified_name_disambiguates() {
        let mut model = Model::new()
            .with_package(Package::new("a").with_type(StructType::new("Item")))
            .with_package(Package::new("b").with_type(StructType::new("Item")))
            .with_type(StructType::new("Holder").with_field(Field::new("item", "b.Item")));

        let diagnostics = resolve(&mut model);

        assert!(diagnostics.is_empty());
        assert_eq!(field_binding(&model, 0, 0), Binding::Type(TypeId::packaged(1, 0)));
    }

    #[test]
    fn test_base_is_kind_restricted() {
        let mut model = Model::new()
            .with_type(EnumerationType::new("Shape"))
            .with_type(StructType::new("Circle").with_base("Shape"));

        let diagnostics = resolve(&mut model);

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.code(), Some(ErrorCode::E102));
        assert!(diagnostic.message().contains("is an enumeration, expected a struct"));
        assert_eq!(
            model.types[1].base().map(|base| base.binding),
            Some(Binding::Unresolved)
        );
    }

    #[test]
    fn test_base_skips_wrong_kind_candidate() {
        // The global `Shape` enumeration does not hide the packaged struct.
        let mut model = Model::new()
            .with_type(EnumerationType::new("Shape"))
            .with_package(
                Package::new("geo")
                    .with_type(StructType::new("Shape"))
                    .with_type(StructType::new("Circle").with_base("Shape")),
            );

        let diagnostics = resolve(&mut model);

        assert!(diagnostics.is_empty());
        assert_eq!(
            model.packages[0].types[1].base().and_then(TypeRef::type_id),
            Some(TypeId::packaged(0, 0))
        );
    }

    #[test]
    fn test_base_excludes_self() {
        let mut model = Model::new().with_type(StructType::new("Node").with_base("Node"));

        let diagnostics = resolve(&mut model);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].code(), Some(ErrorCode::E102));
        assert!(diagnostics.as_slice()[0].message().contains("declaration itself"));
    }

    #[test]
    fn test_enumeration_base() {
        let mut model = Model::new()
            .with_type(EnumerationType::new("Base"))
            .with_type(EnumerationType::new("Derived").with_base("Base"));

        let diagnostics = resolve(&mut model);

        assert!(diagnostics.is_empty());
        assert_eq!(
            model.types[1].base().and_then(TypeRef::type_id),
            Some(TypeId::top_level(0))
        );
    }

    #[test]
    fn test_array_alias_method_and_inner_sites() {
        let mut model = Model::new()
            .with_primitives(builtins())
            .with_type(ArrayType::new("Names", "string").with_size(4))
            .with_type(TypeAlias::new("Age", "uint32"))
            .with_type(
                StructType::new("Registry")
                    .with_inner(StructType::new("Entry").with_field(Field::new("id", "uint32")))
                    .with_field(Field::new("entries", "Entry").with_key("string"))
                    .with_field(Field::new("first", "Registry.Entry"))
                    .with_method(
                        Method::new("lookup")
                            .returning("Age")
                            .with_parameter(Parameter::new("names", "Names")),
                    ),
            );

        let diagnostics = resolve(&mut model);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let names = model.types[0].as_array().expect("array");
        assert!(names.element_type.as_ref().expect("element").basic_id().is_some());

        let age = model.types[1].as_alias().expect("alias");
        assert!(age.actual_type.as_ref().expect("actual").basic_id().is_some());

        let registry = model.types[2].as_struct().expect("struct");
        let entry_id = TypeId::top_level(2).with_inner(0);
        assert_eq!(registry.fields[0].type_ref.type_id(), Some(entry_id));
        assert!(registry.fields[0].key.as_ref().expect("key").basic_id().is_some());
        assert_eq!(registry.fields[1].type_ref.type_id(), Some(entry_id));

        let lookup = &registry.methods[0];
        assert_eq!(
            lookup.returns.as_ref().and_then(TypeRef::type_id),
            Some(TypeId::top_level(1))
        );
        assert_eq!(
            lookup.parameters[0].type_ref.type_id(),
            Some(TypeId::top_level(0))
        );

        let inner = registry.inner_types[0].as_struct().expect("inner struct");
        assert!(inner.fields[0].type_ref.basic_id().is_some());
    }

    #[test]
    fn test_removing_declaration_unresolves_reference() {
        let build = |with_address: bool| {
            let mut model = Model::new()
                .with_type(StructType::new("Person").with_field(Field::new("home", "Address")));
            if with_address {
                model = model.with_type(StructType::new("Address"));
            }
            model
        };

        let mut complete = build(true);
        assert!(resolve(&mut complete).is_empty());
        assert!(field_binding(&complete, 0, 0).is_resolved());

        let mut missing = build(false);
        assert_eq!(resolve(&mut missing).error_count(), 1);
        assert_eq!(field_binding(&missing, 0, 0), Binding::Unresolved);
    }
}
