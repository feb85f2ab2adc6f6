//! Catalog record produced by the extraction engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured build metadata for one repository.
///
/// Mappings are key-ordered so that serializing the same extraction twice
/// yields identical bytes. A dependency whose version referenced an undefined
/// variable is kept with a `null` version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    pub plugins: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, Option<String>>,
    pub gradle_version: Option<String>,
    pub gradle_distribution_url: Option<String>,
}

impl BuildMetadata {
    /// True when nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
            && self.dependencies.is_empty()
            && self.gradle_version.is_none()
            && self.gradle_distribution_url.is_none()
    }

    /// Dependencies whose version could not be resolved
    pub fn unresolved_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter(|(_, version)| version.is_none())
            .map(|(coordinate, _)| coordinate.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let mut metadata = BuildMetadata::default();
        metadata
            .plugins
            .insert("java".to_string(), "No version specified".to_string());
        metadata
            .dependencies
            .insert("org.a:b".to_string(), Some("1.0".to_string()));
        metadata.dependencies.insert("org.c:d".to_string(), None);

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["plugins"]["java"], "No version specified");
        assert_eq!(json["dependencies"]["org.a:b"], "1.0");
        assert!(json["dependencies"]["org.c:d"].is_null());
        assert!(json["gradle_version"].is_null());
        assert!(json["gradle_distribution_url"].is_null());
    }

    #[test]
    fn test_unresolved_dependencies() {
        let mut metadata = BuildMetadata::default();
        metadata
            .dependencies
            .insert("org.a:b".to_string(), Some("1.0".to_string()));
        metadata.dependencies.insert("org.c:d".to_string(), None);

        let unresolved: Vec<_> = metadata.unresolved_dependencies().collect();
        assert_eq!(unresolved, vec!["org.c:d"]);
        assert!(!metadata.is_empty());
        assert!(BuildMetadata::default().is_empty());
    }
}
