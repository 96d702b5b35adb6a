//! Source locations attached to diagnostics.

use std::fmt;

/// Where in the model a diagnostic points.
///
/// `path` is the dotted path of the offending node (`com.example.Person.age`);
/// `line` is the source line recorded by the parser, when known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    line: Option<u32>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
        }
    }

    /// Location of a child node: `self.path` + `.` + `name`.
    pub fn child(&self, name: impl fmt::Display) -> Self {
        Self {
            path: format!("{}.{name}", self.path),
            line: None,
        }
    }

    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {line}"),
            None => write!(f, "{}", self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_path() {
        let location = Location::new("com.example.Person").with_line(Some(3));
        let field = location.child("age");

        assert_eq!(field.path(), "com.example.Person.age");
        assert_eq!(field.line(), None);
    }

    #[test]
    fn test_display_prefers_line() {
        assert_eq!(Location::new("Person").with_line(Some(12)).to_string(), "Line 12");
        assert_eq!(Location::new("Person").to_string(), "Person");
    }
}
