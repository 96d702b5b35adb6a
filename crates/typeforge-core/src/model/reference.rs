//! Type references and declaration handles.
//!
//! A [`TypeRef`] starts out as a name with [`Binding::Pending`]. Scope
//! resolution replaces the binding with a handle into the owning [`Model`],
//! or with [`Binding::Unresolved`] when the name binds to nothing.
//!
//! [`Model`]: crate::model::Model

use std::fmt;

use serde::Deserialize;

use crate::identifier::Id;

/// Handle of a declared type inside a [`Model`](crate::model::Model).
///
/// `package` selects the container (`None` for top-level types), `index` the
/// position inside it, and `inner` a nested type of the struct at that
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId {
    pub package: Option<u32>,
    pub index: u32,
    pub inner: Option<u32>,
}

impl TypeId {
    /// Handle of a top-level type.
    pub fn top_level(index: usize) -> Self {
        Self {
            package: None,
            index: index as u32,
            inner: None,
        }
    }

    /// Handle of a type declared in a package.
    pub fn packaged(package: usize, index: usize) -> Self {
        Self {
            package: Some(package as u32),
            index: index as u32,
            inner: None,
        }
    }

    /// Handle of an inner type of the struct identified by `self`.
    pub fn with_inner(self, inner: usize) -> Self {
        Self {
            inner: Some(inner as u32),
            ..self
        }
    }

    /// Handle of the enclosing declaration (identity for non-inner types).
    pub fn outer(self) -> Self {
        Self {
            inner: None,
            ..self
        }
    }

    /// Returns `true` if this handle designates an inner type.
    pub fn is_inner(&self) -> bool {
        self.inner.is_some()
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.package {
            Some(package) => write!(f, "p{package}:{}", self.index)?,
            None => write!(f, "{}", self.index)?,
        }
        if let Some(inner) = self.inner {
            write!(f, ".{inner}")?;
        }
        Ok(())
    }
}

/// Handle of a primitive type: group position and entry position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicId {
    pub group: u32,
    pub index: u32,
}

impl BasicId {
    pub fn new(group: usize, index: usize) -> Self {
        Self {
            group: group as u32,
            index: index as u32,
        }
    }
}

/// What a [`TypeRef`] is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Not visited by scope resolution yet.
    #[default]
    Pending,
    /// Bound to a primitive type.
    Basic(BasicId),
    /// Bound to a declared type.
    Type(TypeId),
    /// Resolution ran and found no declaration for the name.
    Unresolved,
}

impl Binding {
    /// Returns `true` for [`Binding::Basic`] and [`Binding::Type`].
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Basic(_) | Self::Type(_))
    }
}

/// A reference to a type by name, plus the reference-site modifiers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeRef {
    /// Simple or dotted qualified name as written.
    pub name: Id,

    /// Explicit bit length override (`uint32 : 3`).
    #[serde(default)]
    pub bit_length: Option<u32>,

    /// Binding written by scope resolution.
    #[serde(skip)]
    pub binding: Binding,
}

impl TypeRef {
    /// Creates a pending reference to `name`.
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            bit_length: None,
            binding: Binding::Pending,
        }
    }

    /// Sets an explicit bit length.
    pub fn with_bit_length(mut self, bits: u32) -> Self {
        self.bit_length = Some(bits);
        self
    }

    /// Returns the bound declared type, if any.
    pub fn type_id(&self) -> Option<TypeId> {
        match self.binding {
            Binding::Type(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the bound primitive type, if any.
    pub fn basic_id(&self) -> Option<BasicId> {
        match self.binding {
            Binding::Basic(id) => Some(id),
            _ => None,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
