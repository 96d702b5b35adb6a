//! Error adapter for converting TypeforgeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`TypeforgeError::Analysis`] carries every diagnostic found by scope
//! resolution and validation. Each one is rendered independently, errors
//! first, then warnings, then notes.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, Severity as MietteSeverity};

use typeforge::{Diagnostic, Severity, TypeforgeError};

/// Adapter for a single analysis diagnostic.
///
/// Models are handed over already parsed, so there is no source text to
/// label; the location is part of the message instead.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic) -> Self {
        Self { diag }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diag.location() {
            Some(location) => write!(f, "{location}: {}", self.diag.message()),
            None => write!(f, "{}", self.diag.message()),
        }
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
            Severity::Info => MietteSeverity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }
}

/// Adapter for non-diagnostic [`TypeforgeError`] variants.
///
/// This adapter handles errors that don't carry analysis diagnostics, such
/// as I/O errors, configuration errors, generation defects and failed
/// external commands.
pub struct ErrorAdapter<'a>(pub &'a TypeforgeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TypeforgeError::Io(_) => "typeforge::io",
            TypeforgeError::Analysis { .. } => return None,
            TypeforgeError::Generation(_) => "typeforge::generation",
            TypeforgeError::Config(_) => "typeforge::config",
            TypeforgeError::Command(_) => "typeforge::command",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            TypeforgeError::Generation(_) => Some(Box::new(
                "the model was generated without passing analysis; rerun without --skip-validation",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagnostic collected during analysis.
    Diagnostic(DiagnosticAdapter<'a>),
    /// Any other failure.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`TypeforgeError`] into a list of reportable errors.
///
/// For [`TypeforgeError::Analysis`], this returns one [`Reportable`] per
/// diagnostic, grouped by severity. For other error variants, this returns
/// a single [`Reportable`].
pub fn to_reportables(err: &TypeforgeError) -> Vec<Reportable<'_>> {
    match err.diagnostics() {
        Some(diagnostics) => diagnostics
            .by_severity()
            .into_iter()
            .flat_map(|(_, group)| group)
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d)))
            .collect(),
        None => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use typeforge::{Diagnostics, ErrorCode, GenerationError, Location};

    use super::*;

    fn analysis_error(diagnostics: Vec<Diagnostic>) -> TypeforgeError {
        TypeforgeError::Analysis {
            diagnostics: Diagnostics::from(diagnostics),
        }
    }

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("undefined type `Adress`")
            .with_code(ErrorCode::E100)
            .with_location(Location::new("Person.address"))
            .with_help("did you mean `Address`?");
        let err = analysis_error(vec![diag]);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "Person.address: undefined type `Adress`");
                assert_eq!(d.severity(), Some(MietteSeverity::Error));
                assert_eq!(
                    d.help().map(|h| h.to_string()).as_deref(),
                    Some("did you mean `Address`?")
                );
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_diagnostics_grouped_by_severity() {
        let err = analysis_error(vec![
            Diagnostic::warning("first warning"),
            Diagnostic::error("first error"),
            Diagnostic::info("a note"),
            Diagnostic::error("second error"),
        ]);

        let messages: Vec<String> = to_reportables(&err)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec!["first error", "second error", "first warning", "a note"]
        );
    }

    #[test]
    fn test_non_analysis_error() {
        let err = TypeforgeError::Generation(GenerationError::UnresolvedReference {
            name: "Address".into(),
        });

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Generation error: type reference `Address` is not resolved"
                );
                assert_eq!(
                    e.code().map(|c| c.to_string()).as_deref(),
                    Some("typeforge::generation")
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }
}
