//! The core diagnostic type for the Typeforge error system.
//!
//! A [`Diagnostic`] represents a single error, warning or note with an
//! optional error code, the location of the offending node, and help text.

use std::fmt;

use crate::error::{Location, Severity, error_code::ErrorCode};

/// A diagnostic message about a node of the model.
///
/// # Example
///
/// ```text
/// [ERROR] Line 10: type `User` is defined multiple times in global scope
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    location: Option<Location>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use typeforge_sema::error::{Diagnostic, ErrorCode, Location};
    ///
    /// let diag = Diagnostic::error("undefined type `Foo`")
    ///     .with_code(ErrorCode::E100)
    ///     .with_location(Location::new("Person.address"))
    ///     .with_help("declare `Foo` or fix the spelling");
    ///
    /// assert_eq!(diag.to_string(), "error[E100]: undefined type `Foo`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the location of the offending node, if any.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the plain-text report line: `[LEVEL] <location>: <message>`.
    ///
    /// ```
    /// # use typeforge_sema::error::{Diagnostic, Location};
    ///
    /// let diag = Diagnostic::warning("field `Age` should start with a lowercase letter")
    ///     .with_location(Location::new("Person.Age").with_line(Some(4)));
    ///
    /// assert_eq!(
    ///     diag.report_line(),
    ///     "[WARNING] Line 4: field `Age` should start with a lowercase letter"
    /// );
    /// ```
    pub fn report_line(&self) -> String {
        match &self.location {
            Some(location) => format!("[{}] {location}: {}", self.severity.label(), self.message),
            None => format!("[{}] {}", self.severity.label(), self.message),
        }
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
