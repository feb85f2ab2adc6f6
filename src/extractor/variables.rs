//! String variable bindings declared anywhere in a build script.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// def name = 'v' / val name = "v" / val name: String = "v"
static VARIABLE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:def|val)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[A-Za-z_][\w.<>?]*\s*)?=\s*(?:'([^'\n]*)'|"([^"\n]*)")"#,
    )
    .unwrap()
});

/// Flat, unscoped name -> value table.
///
/// Every binding in the file is visible to every lookup, wherever it was
/// declared. A name declared twice keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    bindings: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = VariableTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// Scan the whole file for `def`/`val` bindings with a string-literal value.
///
/// Numeric, boolean and expression-valued declarations are ignored.
pub fn extract_variables(text: &str) -> VariableTable {
    VARIABLE_DECLARATION
        .captures_iter(text)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3))?;
            Some((caps[1].to_string(), value.as_str().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groovy_and_kotlin_keywords() {
        let text = r#"
def springVersion = '6.1.0'
val jacksonVersion = "2.16.1"
"#;
        let table = extract_variables(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("springVersion"), Some("6.1.0"));
        assert_eq!(table.get("jacksonVersion"), Some("2.16.1"));
    }

    #[test]
    fn test_non_string_values_ignored() {
        let text = "val retries = 3\ndef enabled = true\nval v = other.version\n";
        assert!(extract_variables(text).is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let text = "val v = \"1.0\"\ndef v = '2.0'\n";
        let table = extract_variables(text);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("v"), Some("2.0"));
    }

    #[test]
    fn test_bindings_inside_blocks_are_global() {
        let text = r#"
dependencies {
    val inner = "9.9"
}
ext {
    def other = '1.1'
}
"#;
        let table = extract_variables(text);
        assert_eq!(table.get("inner"), Some("9.9"));
        assert_eq!(table.get("other"), Some("1.1"));
    }

    #[test]
    fn test_type_annotation_tolerated() {
        let table = extract_variables(r#"val ktorVersion: String = "2.3.7""#);
        assert_eq!(table.get("ktorVersion"), Some("2.3.7"));
    }

    #[test]
    fn test_keyword_must_stand_alone() {
        let table = extract_variables(r#"interval x = "1""#);
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_value() {
        let table = extract_variables("def v = ''");
        assert_eq!(table.get("v"), Some(""));
    }

    #[test]
    fn test_from_iterator() {
        let table: VariableTable = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some("3"));
        assert!(table.get("b").is_some());
    }
}
