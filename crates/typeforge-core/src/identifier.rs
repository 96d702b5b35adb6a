//! Interned identifiers for declaration and reference names.
//!
//! Every name in the semantic model (types, fields, packages, enumerators) is
//! an [`Id`]. Names are compared far more often than they are printed during
//! scope resolution and validation, so they are interned once and compared as
//! symbols afterwards.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator between the segments of a qualified name (`com.example.Person`).
pub const QUALIFIER: char = '.';

/// Global string interner shared by all identifiers.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`; the C++ and Protobuf generators may format
/// identifiers from two threads at once.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// An interned name.
///
/// # Examples
///
/// ```
/// use typeforge_core::identifier::Id;
///
/// let package = Id::new("com.example");
/// let person = Id::new("Person");
///
/// let qualified = package.qualify(person);
/// assert_eq!(qualified, "com.example.Person");
/// assert_eq!(qualified.last_segment(), "Person");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Builds a qualified identifier from dotted segments, skipping empty ones.
    ///
    /// ```
    /// use typeforge_core::identifier::Id;
    ///
    /// let id = Id::from_segments(["com", "", "example", "Person"]);
    /// assert_eq!(id, "com.example.Person");
    /// ```
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        Self::new(&joined)
    }

    /// Appends `child` to this identifier with the [`QUALIFIER`] separator.
    pub fn qualify(&self, child: Id) -> Self {
        let mut interner = interner();
        let parent_str = interner
            .resolve(self.0)
            .expect("Parent ID should exist in interner");
        let child_str = interner
            .resolve(child.0)
            .expect("Child ID should exist in interner");
        let qualified = format!("{parent_str}{QUALIFIER}{child_str}");
        Self(interner.get_or_intern(&qualified))
    }

    /// Runs `f` with the string form of this identifier without allocating.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner();
        let value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f(value)
    }

    /// Returns the dotted segments of this identifier.
    pub fn segments(&self) -> Vec<String> {
        self.with_str(|s| {
            s.split(QUALIFIER)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    /// Returns the last dotted segment (the simple name).
    pub fn last_segment(&self) -> String {
        self.with_str(|s| s.rsplit(QUALIFIER).next().unwrap_or(s).to_string())
    }

    /// Returns `true` if the identifier contains a [`QUALIFIER`].
    pub fn is_qualified(&self) -> bool {
        self.with_str(|s| s.contains(QUALIFIER))
    }

    /// Returns the number of characters in the identifier.
    pub fn char_len(&self) -> usize {
        self.with_str(|s| s.chars().count())
    }

    /// Returns `true` for the empty identifier.
    pub fn is_empty(&self) -> bool {
        self.with_str(str::is_empty)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|s| s == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new_interns_equal_names() {
        let id1 = Id::new("Person");
        let id2 = Id::new("Person");
        let id3 = Id::new("Address");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "Person");
    }

    #[test]
    fn test_qualify() {
        let package = Id::new("com.example");
        let qualified = package.qualify(Id::new("Person"));

        assert_eq!(qualified, "com.example.Person");
        assert!(qualified.is_qualified());
        assert_eq!(qualified.last_segment(), "Person");
        assert_eq!(qualified.segments(), vec!["com", "example", "Person"]);
    }

    #[test]
    fn test_from_segments_skips_empty() {
        let id = Id::from_segments(["a", "", "b"]);
        assert_eq!(id, "a.b");
        assert_eq!(id, Id::new("a.b"));
    }

    #[test]
    fn test_simple_name_is_not_qualified() {
        let id = Id::new("Person");
        assert!(!id.is_qualified());
        assert_eq!(id.last_segment(), "Person");
        assert_eq!(id.char_len(), 6);
    }

    #[test]
    fn test_display() {
        let id = Id::new("uint32");
        assert_eq!(format!("{id}"), "uint32");
    }

    #[test]
    fn test_hash_and_eq() {
        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            name: Id,
        }

        let holder: Holder = toml::from_str(r#"name = "Person""#).expect("valid toml");
        assert_eq!(holder.name, "Person");
    }

    #[test]
    fn test_empty() {
        assert!(Id::new("").is_empty());
        assert!(!Id::new("x").is_empty());
    }
}
