//! Line-oriented text building shared by the generators.

/// First line of every generated file, after the language's comment marker.
pub const BANNER: &str = "Auto-generated by typeforge. Do not edit.";

/// Builds indented source text line by line.
///
/// # Examples
///
/// ```
/// use typeforge::text::CodeWriter;
///
/// let mut out = CodeWriter::new("    ");
/// out.line("class A {");
/// out.indented(|out| {
///     out.line("int x;");
/// });
/// out.line("};");
///
/// assert_eq!(out.finish(), "class A {\n    int x;\n};\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buffer: String,
    depth: usize,
    unit: &'static str,
}

impl CodeWriter {
    /// Creates an empty writer indenting by `unit` per level.
    pub fn new(unit: &'static str) -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
            unit,
        }
    }

    /// Writes one line at the current indentation.
    ///
    /// Embedded newlines are split and each part is indented; empty parts
    /// are written without trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for part in text.as_ref().split('\n') {
            if !part.trim().is_empty() {
                for _ in 0..self.depth {
                    self.buffer.push_str(self.unit);
                }
                self.buffer.push_str(part.trim_end());
            }
            self.buffer.push('\n');
        }
        self
    }

    /// Writes an empty line, never two in a row and never at the start.
    pub fn blank(&mut self) -> &mut Self {
        if !self.buffer.is_empty() && !self.buffer.ends_with("\n\n") {
            self.buffer.push('\n');
        }
        self
    }

    /// Writes each element of `lines` prefixed with `marker`.
    pub fn comment(&mut self, marker: &str, lines: &[String]) -> &mut Self {
        for text in lines {
            let text = text.trim_end();
            if text.is_empty() {
                self.line(marker);
            } else {
                self.line(format!("{marker} {text}"));
            }
        }
        self
    }

    /// Runs `f` one indentation level deeper.
    pub fn indented(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.depth += 1;
        f(self);
        self.depth -= 1;
        self
    }

    /// Like [`indented`](Self::indented) for fallible bodies.
    pub fn try_indented<E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<&mut Self, E> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result.map(|()| self)
    }

    /// Returns the text written so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Returns the text, trimmed to end in exactly one newline.
    pub fn finish(self) -> String {
        let mut text = self.buffer;
        while text.ends_with("\n\n") {
            text.pop();
        }
        text
    }
}

/// Uppercases the first character: `name` becomes `Name`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces every character that is not ASCII alphanumeric with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "model".to_string()
    } else {
        sanitized
    }
}
