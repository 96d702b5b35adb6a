//! Declared types: structs, enumerations, named arrays and aliases.

use std::fmt;

use serde::Deserialize;

use crate::{
    identifier::Id,
    model::{expression::Expression, reference::TypeRef},
};

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Struct,
    Enumeration,
    Array,
    Alias,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Struct => "struct",
            Self::Enumeration => "enumeration",
            Self::Array => "array",
            Self::Alias => "alias",
        };
        f.write_str(name)
    }
}

/// A declared type.
///
/// In a TOML model the variant is selected by the `kind` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDef {
    Struct(StructType),
    Enumeration(EnumerationType),
    Array(ArrayType),
    Alias(TypeAlias),
}

impl TypeDef {
    pub fn name(&self) -> Id {
        match self {
            Self::Struct(s) => s.name,
            Self::Enumeration(e) => e.name,
            Self::Array(a) => a.name,
            Self::Alias(a) => a.name,
        }
    }

    /// Attached comment lines.
    pub fn comment(&self) -> &[String] {
        match self {
            Self::Struct(s) => &s.comment,
            Self::Enumeration(e) => &e.comment,
            Self::Array(a) => &a.comment,
            Self::Alias(a) => &a.comment,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Struct(s) => s.line,
            Self::Enumeration(e) => e.line,
            Self::Array(a) => a.line,
            Self::Alias(a) => a.line,
        }
    }

    /// The single-parent `base` reference, for structs and enumerations.
    pub fn base(&self) -> Option<&TypeRef> {
        match self {
            Self::Struct(s) => s.base.as_ref(),
            Self::Enumeration(e) => e.base.as_ref(),
            Self::Array(_) | Self::Alias(_) => None,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Struct(_) => TypeKind::Struct,
            Self::Enumeration(_) => TypeKind::Enumeration,
            Self::Array(_) => TypeKind::Array,
            Self::Alias(_) => TypeKind::Alias,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructType> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&EnumerationType> {
        match self {
            Self::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_alias(&self) -> Option<&TypeAlias> {
        match self {
            Self::Alias(a) => Some(a),
            _ => None,
        }
    }
}

impl From<StructType> for TypeDef {
    fn from(value: StructType) -> Self {
        Self::Struct(value)
    }
}

impl From<EnumerationType> for TypeDef {
    fn from(value: EnumerationType) -> Self {
        Self::Enumeration(value)
    }
}

impl From<ArrayType> for TypeDef {
    fn from(value: ArrayType) -> Self {
        Self::Array(value)
    }
}

impl From<TypeAlias> for TypeDef {
    fn from(value: TypeAlias) -> Self {
        Self::Alias(value)
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Protected,
    Public,
}

impl Visibility {
    /// All visibility levels in C++ access block order.
    pub const ALL: [Visibility; 3] = [Self::Private, Self::Protected, Self::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
        }
    }
}

/// A struct (entity) declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructType {
    pub name: Id,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    #[serde(default)]
    pub friends: Vec<Friend>,
    #[serde(default)]
    pub options: StructOptions,
    /// Explicit C++ namespace, `::` or `.` separated.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub inner_types: Vec<TypeDef>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl StructType {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            base: None,
            comment: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            friends: Vec::new(),
            options: StructOptions::default(),
            namespace: None,
            inner_types: Vec::new(),
            line: None,
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_friend(mut self, friend: Friend) -> Self {
        self.friends.push(friend);
        self
    }

    pub fn with_inner(mut self, inner: impl Into<TypeDef>) -> Self {
        self.inner_types.push(inner.into());
        self
    }

    pub fn with_options(mut self, options: StructOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.comment.push(line.into());
        self
    }

    /// Fields that belong to instances, in declaration order.
    pub fn instance_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.is_static)
    }

    /// Returns `true` if any method is declared pure virtual.
    pub fn is_abstract(&self) -> bool {
        self.methods
            .iter()
            .any(|method| method.has(MethodModifier::PureVirtual))
    }

    /// Returns `true` if any method is virtual (pure virtual included).
    pub fn has_virtual_methods(&self) -> bool {
        self.methods.iter().any(|method| {
            method.has(MethodModifier::Virtual) || method.has(MethodModifier::PureVirtual)
        })
    }

    /// Returns `true` if an authored method is named `name`.
    pub fn has_method_named(&self, name: &str) -> bool {
        self.methods.iter().any(|method| method.name == name)
    }
}

/// A struct field (attribute).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: Id,
    #[serde(default)]
    pub visibility: Visibility,
    pub type_ref: TypeRef,
    /// Key type of a map-like field; `type_ref` is then the value type.
    #[serde(default)]
    pub key: Option<TypeRef>,
    #[serde(default)]
    pub default: Option<Expression>,
    #[serde(default, alias = "static")]
    pub is_static: bool,
    /// Fixed size of an inline array field.
    #[serde(default)]
    pub array_size: Option<i64>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl Field {
    pub fn new(name: impl Into<Id>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Private,
            type_ref: type_ref.into(),
            key: None,
            default: None,
            is_static: false,
            array_size: None,
            comment: Vec::new(),
            line: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_key(mut self, key: impl Into<TypeRef>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_default(mut self, default: Expression) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_array_size(mut self, size: i64) -> Self {
        self.array_size = Some(size);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Returns `true` for fields holding exactly one value (no inline array, no map).
    pub fn is_single_valued(&self) -> bool {
        self.array_size.is_none() && self.key.is_none()
    }
}

/// Method modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodModifier {
    Const,
    Virtual,
    Static,
    Override,
    Noexcept,
    PureVirtual,
}

/// A method or constructor parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameter {
    pub name: Id,
    pub type_ref: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<Id>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
        }
    }
}

/// A method declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Method {
    pub name: Id,
    #[serde(default = "public_visibility")]
    pub visibility: Visibility,
    /// Return type; `None` is `void`.
    #[serde(default)]
    pub returns: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub modifiers: Vec<MethodModifier>,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw C++ body text.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

fn public_visibility() -> Visibility {
    Visibility::Public
}

impl Method {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            returns: None,
            parameters: Vec::new(),
            modifiers: Vec::new(),
            description: None,
            body: None,
            line: None,
        }
    }

    pub fn returning(mut self, returns: impl Into<TypeRef>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_modifier(mut self, modifier: MethodModifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn has(&self, modifier: MethodModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// A constructor initializer-list entry: `member(value)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Initializer {
    pub member: Id,
    /// Raw C++ initializer expression.
    pub value: String,
}

/// An explicitly authored constructor.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constructor {
    #[serde(default = "public_visibility")]
    pub visibility: Visibility,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub initializers: Vec<Initializer>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl Constructor {
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Public,
            explicit: false,
            parameters: Vec::new(),
            initializers: Vec::new(),
            body: None,
            line: None,
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_initializer(mut self, member: impl Into<Id>, value: impl Into<String>) -> Self {
        self.initializers.push(Initializer {
            member: member.into(),
            value: value.into(),
        });
        self
    }

    pub fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }
}

impl Default for Constructor {
    fn default() -> Self {
        Self::new()
    }
}

/// A friend declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Friend {
    /// `friend class Name;`
    Class(String),
    /// A raw function signature: `friend <signature>;`
    Function(String),
}

/// Optional code-generation features of a struct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructOptions {
    pub threading: bool,
    pub serialization: bool,
    pub operators: bool,
    pub copy_semantics: bool,
    pub move_semantics: bool,
}

/// An enumeration declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumerationType {
    pub name: Id,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub enumerators: Vec<Enumerator>,
    /// C++ underlying type, written as-is.
    #[serde(default)]
    pub underlying_type: Option<String>,
    #[serde(default = "enum_class_default")]
    pub is_enum_class: bool,
    #[serde(default)]
    pub line: Option<u32>,
}

fn enum_class_default() -> bool {
    true
}

impl EnumerationType {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            base: None,
            comment: Vec::new(),
            enumerators: Vec::new(),
            underlying_type: None,
            is_enum_class: true,
            line: None,
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_enumerator(mut self, enumerator: Enumerator) -> Self {
        self.enumerators.push(enumerator);
        self
    }

    pub fn with_underlying_type(mut self, underlying: impl Into<String>) -> Self {
        self.underlying_type = Some(underlying.into());
        self
    }

    /// Effective integer values, one per enumerator.
    ///
    /// An explicit value is evaluated; an implicit one is the previous value
    /// plus one, or `0` for the first enumerator.
    ///
    /// ```
    /// use typeforge_core::model::{Enumerator, EnumerationType};
    ///
    /// let status = EnumerationType::new("Status")
    ///     .with_enumerator(Enumerator::new("IDLE"))
    ///     .with_enumerator(Enumerator::with_value("BUSY", 5))
    ///     .with_enumerator(Enumerator::new("DONE"));
    ///
    /// assert_eq!(status.effective_values(), vec![0, 5, 6]);
    /// ```
    pub fn effective_values(&self) -> Vec<i64> {
        let mut next = 0i64;
        self.enumerators
            .iter()
            .map(|enumerator| {
                let value = enumerator
                    .value
                    .as_ref()
                    .map(Expression::evaluate)
                    .unwrap_or(next);
                next = value.saturating_add(1);
                value
            })
            .collect()
    }

    /// Returns `true` if some enumerator has effective value `0`.
    pub fn has_zero(&self) -> bool {
        self.effective_values().contains(&0)
    }
}

/// A symbolic enumeration constant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Enumerator {
    pub name: Id,
    #[serde(default)]
    pub value: Option<Expression>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl Enumerator {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            value: None,
            line: None,
        }
    }

    pub fn with_value(name: impl Into<Id>, value: i64) -> Self {
        Self {
            value: Some(Expression::integer(value)),
            ..Self::new(name)
        }
    }
}

/// A named array type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrayType {
    pub name: Id,
    #[serde(default)]
    pub element_type: Option<TypeRef>,
    /// Fixed size; absent means a dynamically sized sequence.
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl ArrayType {
    pub fn new(name: impl Into<Id>, element_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            element_type: Some(element_type.into()),
            size: None,
            comment: Vec::new(),
            line: None,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }
}

/// A named synonym for another type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeAlias {
    pub name: Id,
    #[serde(default)]
    pub actual_type: Option<TypeRef>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl TypeAlias {
    pub fn new(name: impl Into<Id>, actual_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            actual_type: Some(actual_type.into()),
            comment: Vec::new(),
            line: None,
        }
    }
}
