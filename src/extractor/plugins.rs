//! Plugin extraction from the `plugins {}` block.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::block::{CaptureCursor, find_block};
use super::dialect::Dialect;
use crate::constants::extraction::{KOTLIN_PLUGIN_PREFIX, NO_PLUGIN_VERSION};

static PLUGINS_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bplugins\s*\{").unwrap());

// id 'name' version '1.0'  /  id "name" version "1.0"
static GROOVY_PLUGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bid\s*['"]([^'"]*)['"]\s*(?:version\s*['"]([^'"]*)['"])?"#).unwrap()
});

// id("name") version "1.0", each quote optionally preceded by a backslash.
// kotlin("jvm") is the shorthand for id("org.jetbrains.kotlin.jvm").
static KOTLIN_PLUGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(id|kotlin)\s*\(\s*\\?"([^"\\]*)\\?"\s*\)(?:\s*version\s*\\?"([^"\\]*)\\?")?"#,
    )
    .unwrap()
});

/// One plugin declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    pub name: String,
    pub version: Option<String>,
}

impl PluginRecord {
    /// Declared version, or the "No version specified" marker
    pub fn version_or_marker(&self) -> &str {
        self.version.as_deref().unwrap_or(NO_PLUGIN_VERSION)
    }
}

/// Lazy sequence of plugin declarations in one block
#[derive(Debug, Clone)]
pub struct PluginMatches<'a> {
    cursor: CaptureCursor<'static, 'a>,
    dialect: Dialect,
}

impl<'a> PluginMatches<'a> {
    pub fn new(block: &'a str, dialect: Dialect) -> Self {
        let regex: &'static Regex = match dialect {
            Dialect::Groovy => &*GROOVY_PLUGIN,
            Dialect::Kotlin => &*KOTLIN_PLUGIN,
        };
        Self {
            cursor: CaptureCursor::new(regex, block),
            dialect,
        }
    }
}

impl Iterator for PluginMatches<'_> {
    type Item = PluginRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.cursor.next()?;
        Some(match self.dialect {
            Dialect::Groovy => groovy_record(&caps),
            Dialect::Kotlin => kotlin_record(&caps),
        })
    }
}

fn groovy_record(caps: &Captures<'_>) -> PluginRecord {
    PluginRecord {
        name: caps[1].to_string(),
        version: caps.get(2).map(|m| m.as_str().to_string()),
    }
}

fn kotlin_record(caps: &Captures<'_>) -> PluginRecord {
    let name = if &caps[1] == "kotlin" {
        format!("{}{}", KOTLIN_PLUGIN_PREFIX, &caps[2])
    } else {
        caps[2].to_string()
    };
    PluginRecord {
        name,
        version: caps.get(3).map(|m| m.as_str().to_string()),
    }
}

/// Body of the first `plugins {}` block, if any
pub fn plugins_block(text: &str) -> Option<&str> {
    find_block(text, &PLUGINS_BLOCK)
}

/// Extract `name -> version` for every plugin in the first `plugins {}` block.
///
/// A plugin declared more than once keeps its last version. Declarations that
/// do not fit the grammar are skipped.
pub fn extract_plugins(text: &str, dialect: Dialect) -> BTreeMap<String, String> {
    let mut plugins = BTreeMap::new();
    if let Some(block) = plugins_block(text) {
        collect_plugins(block, dialect, &mut plugins);
    }
    plugins
}

/// Insert the matches of one grammar into `plugins`, overwriting earlier entries.
pub(crate) fn collect_plugins(
    block: &str,
    dialect: Dialect,
    plugins: &mut BTreeMap<String, String>,
) {
    for record in PluginMatches::new(block, dialect) {
        let version = record.version_or_marker().to_string();
        plugins.insert(record.name, version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_plugins_block() {
        assert!(extract_plugins("dependencies {}", Dialect::Groovy).is_empty());
        assert!(extract_plugins("", Dialect::Kotlin).is_empty());
    }

    #[test]
    fn test_groovy_with_version() {
        let text = "plugins { id 'foo.bar' version '1.2.3' }";
        let plugins = extract_plugins(text, Dialect::detect(text));
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins["foo.bar"], "1.2.3");
    }

    #[test]
    fn test_groovy_double_quotes() {
        let text = r#"plugins {
    id "org.springframework.boot" version "3.2.0"
    id "java"
}"#;
        let plugins = extract_plugins(text, Dialect::Groovy);
        assert_eq!(plugins["org.springframework.boot"], "3.2.0");
        assert_eq!(plugins["java"], NO_PLUGIN_VERSION);
    }

    #[test]
    fn test_groovy_without_version() {
        let plugins = extract_plugins("plugins { id 'foo.bar' }", Dialect::Groovy);
        assert_eq!(plugins["foo.bar"], "No version specified");
    }

    #[test]
    fn test_kotlin_with_version() {
        let text = r#"plugins { id("foo.bar") version "1.2.3" }"#;
        assert_eq!(Dialect::detect(text), Dialect::Kotlin);
        let plugins = extract_plugins(text, Dialect::detect(text));
        assert_eq!(plugins["foo.bar"], "1.2.3");
    }

    #[test]
    fn test_kotlin_escaped_quotes_tolerated() {
        let text = r#"plugins { id(\"foo.bar\") version \"1.2.3\" }"#;
        let plugins = extract_plugins(text, Dialect::Kotlin);
        assert_eq!(plugins["foo.bar"], "1.2.3");
    }

    #[test]
    fn test_kotlin_without_version() {
        let text = r#"plugins {
    id("application")
    id("com.diffplug.spotless") version "6.25.0" apply false
}"#;
        let plugins = extract_plugins(text, Dialect::Kotlin);
        assert_eq!(plugins["application"], NO_PLUGIN_VERSION);
        assert_eq!(plugins["com.diffplug.spotless"], "6.25.0");
    }

    #[test]
    fn test_kotlin_shorthand() {
        let text = r#"plugins { kotlin("jvm") version "1.9.22"
    id("java") }"#;
        let plugins = extract_plugins(text, Dialect::Kotlin);
        assert_eq!(plugins["org.jetbrains.kotlin.jvm"], "1.9.22");
        assert_eq!(plugins["java"], NO_PLUGIN_VERSION);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "plugins {\n id 'a' version '1'\n id 'a' version '2'\n}";
        let plugins = extract_plugins(text, Dialect::Groovy);
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins["a"], "2");
    }

    #[test]
    fn test_only_first_block_is_read() {
        let text = "plugins { id 'a' }\nplugins { id 'b' }";
        let plugins = extract_plugins(text, Dialect::Groovy);
        assert!(plugins.contains_key("a"));
        assert!(!plugins.contains_key("b"));
    }

    #[test]
    fn test_nested_block_not_truncated() {
        let text = r#"plugins {
    id("a") version "1" apply false
    if (true) { id("b") }
    id("c") version "3"
}"#;
        let plugins = extract_plugins(text, Dialect::Kotlin);
        assert_eq!(plugins["c"], "3");
        assert_eq!(plugins["b"], NO_PLUGIN_VERSION);
    }

    #[test]
    fn test_malformed_declarations_skipped() {
        let text = "plugins {\n id\n apply plugin: 'x'\n id 'ok' version '1'\n}";
        let plugins = extract_plugins(text, Dialect::Groovy);
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins["ok"], "1");
    }

    #[test]
    fn test_plugin_matches_restartable() {
        let block = " id 'a'\n id 'b' version '2' ";
        let matches = PluginMatches::new(block, Dialect::Groovy);
        let first: Vec<_> = matches.clone().collect();
        let second: Vec<_> = matches.collect();
        assert_eq!(first, second);
        assert_eq!(first[1].version.as_deref(), Some("2"));
    }
}
