//! Typeforge semantic analysis.
//!
//! This crate turns a parsed [`Model`] into a resolved, validated one:
//!
//! 1. [`resolve`] binds every type reference to a primitive or declared type
//!    (see [`ScopeResolver`]).
//! 2. [`validate`] checks model invariants and style rules without touching
//!    the model (see [`Validator`]).
//!
//! Both phases collect every finding into [`Diagnostics`] instead of stopping
//! at the first problem. [`analyze`] runs both and fails with an
//! [`AnalysisError`] when any error-severity diagnostic was produced.
//!
//! # Example
//!
//! ```
//! use typeforge_core::model::{BasicTypeId, Field, Model, PrimitiveTypeDef, StructType};
//!
//! let mut model = Model::new()
//!     .with_primitives(
//!         PrimitiveTypeDef::new("Builtins")
//!             .with(BasicTypeId::value("uint32", 32))
//!             .with(BasicTypeId::string("string")),
//!     )
//!     .with_type(
//!         StructType::new("Person")
//!             .with_field(Field::new("name", "string"))
//!             .with_field(Field::new("age", "uint32")),
//!     );
//!
//! let diagnostics = typeforge_sema::analyze(&mut model).expect("model is valid");
//! assert!(diagnostics.is_empty());
//! ```
//!
//! [`Model`]: typeforge_core::model::Model
//! [`Diagnostics`]: error::Diagnostics
//! [`AnalysisError`]: error::AnalysisError

pub mod error;
mod scope;
mod validate;

use log::{debug, info};

use typeforge_core::model::Model;

use error::{AnalysisError, Diagnostics};

pub use scope::ScopeResolver;
pub use validate::{
    MAX_ARRAY_SIZE, MAX_BIT_LENGTH, MAX_ENUMERATOR_VALUE, MAX_PRIMITIVE_LENGTH, Scope, Validator,
    Visitor, entry_location, visit_model, walk_field, walk_method, walk_model, walk_struct,
    walk_type_def,
};

/// Resolves every type reference of `model` in place.
pub fn resolve(model: &mut Model) -> Diagnostics {
    ScopeResolver::new(model).resolve(model)
}

/// Validates a resolved model.
pub fn validate(model: &Model) -> Diagnostics {
    Validator::new(model).validate()
}

/// Resolves and validates `model`.
///
/// Returns every warning and note on success, or all diagnostics when at
/// least one of them is an error.
pub fn analyze(model: &mut Model) -> Result<Diagnostics, AnalysisError> {
    info!("Resolving type references");
    let mut diagnostics = resolve(model);
    debug!(diagnostics = diagnostics.len(); "Resolved type references");

    info!("Validating model");
    diagnostics.append(validate(model));
    debug!(
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count();
        "Analysis finished",
    );

    diagnostics.finish()
}
