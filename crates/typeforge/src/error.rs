//! Error types for Typeforge operations.
//!
//! This module provides the main error type [`TypeforgeError`] which wraps
//! the error conditions that can occur while compiling a model, and
//! [`GenerationError`] for internal defects detected by the generators.

use std::io;

use thiserror::Error;

use typeforge_core::identifier::Id;
use typeforge_sema::error::{AnalysisError, Diagnostics};

/// The main error type for Typeforge operations.
///
/// # Diagnostic Variants
///
/// The `Analysis` variant carries every diagnostic collected by scope
/// resolution and validation, so the caller can report all of them instead
/// of only the first.
#[derive(Debug, Error)]
pub enum TypeforgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("model analysis failed: {}", .diagnostics.summary())]
    Analysis { diagnostics: Diagnostics },

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command failed: {0}")]
    Command(String),
}

impl From<AnalysisError> for TypeforgeError {
    fn from(error: AnalysisError) -> Self {
        Self::Analysis {
            diagnostics: error.into_diagnostics(),
        }
    }
}

impl TypeforgeError {
    /// Returns the analysis diagnostics carried by this error, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Analysis { diagnostics } => Some(diagnostics),
            _ => None,
        }
    }
}

/// A generator was invoked on a model that did not pass analysis.
///
/// These never describe a problem in the user's model; they mean the caller
/// skipped the analysis gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("type reference `{name}` is not resolved")]
    UnresolvedReference { name: Id },

    #[error("type reference `{name}` points to missing declaration {handle}")]
    DanglingHandle { name: Id, handle: String },
}
