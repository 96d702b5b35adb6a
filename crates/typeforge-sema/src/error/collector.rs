//! Ordered diagnostic list and the error returned when it carries errors.
//!
//! [`Diagnostics`] lets a phase report every problem it finds instead of
//! failing on the first one. [`AnalysisError`] wraps the full list once
//! analysis finished with at least one error.

use thiserror::Error;

use crate::error::{Diagnostic, Severity};

/// An ordered collection of diagnostics.
///
/// # Example
///
/// ```
/// # use typeforge_sema::error::{Diagnostic, Diagnostics, ErrorCode};
///
/// let mut diagnostics = Diagnostics::new();
///
/// diagnostics.emit(Diagnostic::warning("field `Name` should be lower camel case")
///     .with_code(ErrorCode::E300));
/// assert!(diagnostics.clone().finish().is_ok());
///
/// diagnostics.emit(Diagnostic::error("undefined type `Adress`")
///     .with_code(ErrorCode::E100));
/// let err = diagnostics.finish().unwrap_err();
/// assert_eq!(err.diagnostics().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collection.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic of `other`, keeping order.
    pub fn append(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity().is_error())
    }

    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity() == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics grouped by severity (errors, then warnings, then notes),
    /// each group in emission order. Empty groups are omitted.
    pub fn by_severity(&self) -> Vec<(Severity, Vec<&Diagnostic>)> {
        [Severity::Error, Severity::Warning, Severity::Info]
            .into_iter()
            .map(|severity| {
                let group: Vec<&Diagnostic> = self
                    .diagnostics
                    .iter()
                    .filter(|diagnostic| diagnostic.severity() == severity)
                    .collect();
                (severity, group)
            })
            .filter(|(_, group)| !group.is_empty())
            .collect()
    }

    /// One-line summary such as `2 errors, 1 warning`.
    pub fn summary(&self) -> String {
        let plural = |count: usize, noun: &str| {
            if count == 1 {
                format!("{count} {noun}")
            } else {
                format!("{count} {noun}s")
            }
        };
        format!(
            "{}, {}",
            plural(self.error_count(), "error"),
            plural(self.warning_count(), "warning")
        )
    }

    /// Finish collection.
    ///
    /// - If there are errors, returns `Err(AnalysisError)` with all diagnostics.
    /// - Otherwise returns the (possibly non-empty) list of warnings and notes.
    pub fn finish(self) -> Result<Diagnostics, AnalysisError> {
        if self.has_errors() {
            Err(AnalysisError::new(self))
        } else {
            Ok(self)
        }
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// Error type for the analysis phase (resolution and validation).
///
/// Carries every diagnostic of the phase, not only the errors.
#[derive(Debug, Error)]
#[error("model analysis failed: {}", .diagnostics.summary())]
pub struct AnalysisError {
    diagnostics: Diagnostics,
}

impl AnalysisError {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_finish_empty_ok() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.finish().is_ok());
    }

    #[test]
    fn test_finish_warnings_only_keeps_them() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.emit(Diagnostic::warning("warning 1"));
        diagnostics.emit(Diagnostic::info("note 1"));

        let kept = diagnostics.finish().expect("warnings do not fail analysis");
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_finish_with_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.emit(Diagnostic::error("error 1").with_code(ErrorCode::E100));
        diagnostics.emit(Diagnostic::warning("warning 1"));
        diagnostics.emit(Diagnostic::error("error 2"));

        let err = diagnostics.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics().error_count(), 2);
        assert_eq!(err.to_string(), "model analysis failed: 2 errors, 1 warning");
    }

    #[test]
    fn test_by_severity_groups_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.emit(Diagnostic::warning("w1"));
        diagnostics.emit(Diagnostic::error("e1"));
        diagnostics.emit(Diagnostic::warning("w2"));

        let groups = diagnostics.by_severity();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Severity::Error);
        assert_eq!(groups[1].0, Severity::Warning);

        let warnings: Vec<&str> = groups[1].1.iter().map(|d| d.message()).collect();
        assert_eq!(warnings, vec!["w1", "w2"]);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut first = Diagnostics::from(vec![Diagnostic::error("a")]);
        first.append(Diagnostics::from(vec![Diagnostic::warning("b")]));

        let messages: Vec<&str> = first.iter().map(Diagnostic::message).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }
}
