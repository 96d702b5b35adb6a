//! Generated files and the sinks that store them.
//!
//! Generators return [`GeneratedFiles`]: logical paths (`include/Person.h`,
//! `people.proto`) mapped to text, in generation order. An [`OutputSink`]
//! decides where that text goes and whether existing files are replaced.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::error::TypeforgeError;

/// Logical path to generated text, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    files: IndexMap<String, String>,
}

impl GeneratedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file. A second file with the same path replaces the first in
    /// place and is logged, since two declarations share a file stem.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        if self.files.insert(path.clone(), content.into()).is_some() {
            warn!(path = path; "Generated file path collision, keeping the later file");
        }
    }

    /// Moves every file of `other` into `self`.
    pub fn extend(&mut self, other: GeneratedFiles) {
        for (path, content) in other.files {
            self.insert(path, content);
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates `(path, content)` pairs in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    /// Iterates paths in generation order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

/// What happened to one file handed to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file existed and overwriting was not allowed.
    Skipped,
}

/// A destination for generated files.
pub trait OutputSink {
    /// Stores one file, honoring the sink's overwrite policy.
    fn write(&mut self, path: &str, content: &str) -> Result<WriteOutcome, TypeforgeError>;

    /// Stores every file in generation order.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be written.
    fn write_all(
        &mut self,
        files: &GeneratedFiles,
    ) -> Result<Vec<(String, WriteOutcome)>, TypeforgeError> {
        let mut outcomes = Vec::with_capacity(files.len());
        for (path, content) in files.iter() {
            let outcome = self.write(path, content)?;
            outcomes.push((path.to_string(), outcome));
        }
        let skipped = outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == WriteOutcome::Skipped)
            .count();
        info!(written = outcomes.len() - skipped, skipped = skipped; "Output written");
        Ok(outcomes)
    }
}

/// Keeps files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: GeneratedFiles,
    force_overwrite: bool,
}

impl MemorySink {
    pub fn new(force_overwrite: bool) -> Self {
        Self {
            files: GeneratedFiles::new(),
            force_overwrite,
        }
    }

    /// Returns the stored files.
    pub fn files(&self) -> &GeneratedFiles {
        &self.files
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, path: &str, content: &str) -> Result<WriteOutcome, TypeforgeError> {
        if self.files.contains(path) && !self.force_overwrite {
            return Ok(WriteOutcome::Skipped);
        }
        self.files.files.insert(path.to_string(), content.to_string());
        Ok(WriteOutcome::Written)
    }
}

/// Writes files below a root directory, creating parent directories.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    force_overwrite: bool,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, force_overwrite: bool) -> Self {
        Self {
            root: root.into(),
            force_overwrite,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, path: &str, content: &str) -> Result<WriteOutcome, TypeforgeError> {
        let target = self.root.join(path);
        if target.exists() && !self.force_overwrite {
            debug!(path:? = target; "Skipping existing file");
            return Ok(WriteOutcome::Skipped);
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        debug!(path:? = target; "Wrote file");
        Ok(WriteOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeneratedFiles {
        let mut files = GeneratedFiles::new();
        files.insert("include/Person.h", "// header\n");
        files.insert("src/Person.cpp", "// source\n");
        files
    }

    #[test]
    fn test_generated_files_keep_order() {
        let mut files = sample();
        files.insert("CMakeLists.txt", "# build\n");
        files.insert("include/Person.h", "// replaced\n");

        let paths: Vec<&str> = files.paths().collect();
        assert_eq!(
            paths,
            vec!["include/Person.h", "src/Person.cpp", "CMakeLists.txt"]
        );
        assert_eq!(files.get("include/Person.h"), Some("// replaced\n"));
    }

    #[test]
    fn test_memory_sink_skips_existing_without_force() {
        let mut sink = MemorySink::new(false);
        sink.write_all(&sample()).expect("write");

        let outcome = sink.write("src/Person.cpp", "// changed\n").expect("write");
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(sink.files().get("src/Person.cpp"), Some("// source\n"));

        let mut forced = MemorySink::new(true);
        forced.write_all(&sample()).expect("write");
        let outcome = forced.write("src/Person.cpp", "// changed\n").expect("write");
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(forced.files().get("src/Person.cpp"), Some("// changed\n"));
    }

    #[test]
    fn test_directory_sink_creates_parents_and_respects_policy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DirectorySink::new(dir.path(), false);

        let outcomes = sink.write_all(&sample()).expect("write");
        assert!(outcomes.iter().all(|(_, o)| *o == WriteOutcome::Written));
        assert_eq!(
            fs::read_to_string(dir.path().join("include/Person.h")).expect("read"),
            "// header\n"
        );

        let outcome = sink.write("include/Person.h", "// new\n").expect("write");
        assert_eq!(outcome, WriteOutcome::Skipped);

        let mut forced = DirectorySink::new(dir.path(), true);
        let outcome = forced.write("include/Person.h", "// new\n").expect("write");
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(
            fs::read_to_string(dir.path().join("include/Person.h")).expect("read"),
            "// new\n"
        );
    }
}
