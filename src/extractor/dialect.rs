//! Build script dialect detection.

use serde::{Deserialize, Serialize};

/// Plugin declaration grammar of a build script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `id 'name' version '1.0'`
    Groovy,
    /// `id("name") version "1.0"`
    Kotlin,
}

impl Dialect {
    /// Classify build script text.
    ///
    /// Any occurrence of `id(` selects Kotlin, so a file mixing both styles
    /// is treated as Kotlin.
    pub fn detect(text: &str) -> Self {
        if text.contains("id(") {
            Dialect::Kotlin
        } else {
            Dialect::Groovy
        }
    }

    /// The other grammar
    pub fn other(self) -> Self {
        match self {
            Dialect::Groovy => Dialect::Kotlin,
            Dialect::Kotlin => Dialect::Groovy,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Groovy => write!(f, "groovy"),
            Dialect::Kotlin => write!(f, "kotlin"),
        }
    }
}

/// How the plugin grammar is chosen for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialectMode {
    /// Substring heuristic (`Dialect::detect`)
    #[default]
    Auto,
    /// Always use the Groovy grammar
    Groovy,
    /// Always use the Kotlin grammar
    Kotlin,
    /// Run both grammars; on a conflicting plugin name the detected dialect wins
    Merge,
}

impl DialectMode {
    /// Grammars to run for `text`, in increasing precedence
    pub fn grammars(self, text: &str) -> Vec<Dialect> {
        match self {
            DialectMode::Auto => vec![Dialect::detect(text)],
            DialectMode::Groovy => vec![Dialect::Groovy],
            DialectMode::Kotlin => vec![Dialect::Kotlin],
            DialectMode::Merge => {
                let primary = Dialect::detect(text);
                vec![primary.other(), primary]
            }
        }
    }
}

impl std::fmt::Display for DialectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectMode::Auto => write!(f, "auto"),
            DialectMode::Groovy => write!(f, "groovy"),
            DialectMode::Kotlin => write!(f, "kotlin"),
            DialectMode::Merge => write!(f, "merge"),
        }
    }
}

impl std::str::FromStr for DialectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DialectMode::Auto),
            "groovy" => Ok(DialectMode::Groovy),
            "kotlin" => Ok(DialectMode::Kotlin),
            "merge" => Ok(DialectMode::Merge),
            _ => Err(format!(
                "Unknown dialect mode: {}. Valid values: auto, groovy, kotlin, merge",
                s
            )),
        }
    }
}
