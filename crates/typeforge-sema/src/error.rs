//! Error and diagnostic system for model analysis.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Node locations (dotted path plus source line when known)
//! - Severity levels
//! - An ordered diagnostic list for accumulating every finding of a pass
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error, warning or note with an error code, a [`Location`] and
//! help text. Diagnostics are accumulated in [`Diagnostics`]; when analysis
//! ends with at least one error the list is wrapped in [`AnalysisError`].
//!
//! # Example
//!
//! ```
//! # use typeforge_sema::error::{Diagnostic, ErrorCode, Location};
//!
//! let diag = Diagnostic::error("type `User` is defined multiple times in global scope")
//!     .with_code(ErrorCode::E200)
//!     .with_location(Location::new("User").with_line(Some(10)))
//!     .with_help("remove the duplicate or use a different name");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod location;
mod severity;

pub use collector::{AnalysisError, Diagnostics};
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use location::Location;
pub use severity::Severity;
