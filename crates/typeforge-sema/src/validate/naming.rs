//! Naming convention checks.
//!
//! | Kind       | Convention                                     |
//! |------------|------------------------------------------------|
//! | field      | `[a-z][a-zA-Z0-9_]*`                           |
//! | type       | `[A-Z][a-zA-Z0-9_]*`                           |
//! | enumerator | `[A-Z][A-Z0-9_]*`                              |
//! | package    | `[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*`          |

use convert_case::{Case, Casing};

/// Names longer than this many characters get a warning.
pub const MAX_NAME_LENGTH: usize = 100;

fn is_word_tail(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `[a-z][a-zA-Z0-9_]*`
pub fn is_lower_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase()) && chars.all(is_word_tail)
}

/// `[A-Z][a-zA-Z0-9_]*`
pub fn is_upper_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase()) && chars.all(is_word_tail)
}

/// `[A-Z][A-Z0-9_]*`
pub fn is_upper_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// `[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*`
pub fn is_package_name(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    })
}

/// Suggested field name.
pub fn suggest_field(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// Suggested type name.
pub fn suggest_type(name: &str) -> String {
    name.to_case(Case::UpperCamel)
}

/// Suggested enumerator name.
pub fn suggest_enumerator(name: &str) -> String {
    name.to_case(Case::Constant)
}

/// Suggested package name.
pub fn suggest_package(name: &str) -> String {
    name.split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_camel_case() {
        assert!(is_lower_camel_case("firstName"));
        assert!(is_lower_camel_case("x_1"));
        assert!(!is_lower_camel_case("FirstName"));
        assert!(!is_lower_camel_case("_name"));
        assert!(!is_lower_camel_case(""));
    }

    #[test]
    fn test_upper_camel_case() {
        assert!(is_upper_camel_case("Person"));
        assert!(is_upper_camel_case("HTTP_Request2"));
        assert!(!is_upper_camel_case("person"));
        assert!(!is_upper_camel_case("Per-son"));
    }

    #[test]
    fn test_upper_case() {
        assert!(is_upper_case("RED"));
        assert!(is_upper_case("LEVEL_2"));
        assert!(!is_upper_case("Red"));
        assert!(!is_upper_case("2RED"));
    }

    #[test]
    fn test_package_name() {
        assert!(is_package_name("com.example"));
        assert!(is_package_name("a1.b_2"));
        assert!(!is_package_name("com.Example"));
        assert!(!is_package_name("com..example"));
        assert!(!is_package_name("1com"));
        assert!(!is_package_name(""));
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(suggest_field("FirstName"), "firstName");
        assert_eq!(suggest_type("order_item"), "OrderItem");
        assert_eq!(suggest_enumerator("darkRed"), "DARK_RED");
        assert_eq!(suggest_package("Com.MyShop"), "com.my_shop");
    }
}
