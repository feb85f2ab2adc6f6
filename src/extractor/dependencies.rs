//! Dependency extraction from the `dependencies {}` block.
//!
//! Each `implementation("group:artifact:version")` literal is split at its
//! rightmost colon. The version segment is either a literal version or a
//! `$name` / `${name}` reference resolved against the file's variables.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::block::{CaptureCursor, find_block};
use super::variables::VariableTable;
use crate::constants::extraction::{DEFAULT_CONFIGURATION, UNKNOWN_DEPENDENCY_VERSION};
use crate::types::{GradleMetaError, Result};

static DEPENDENCIES_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdependencies\s*\{").unwrap());

static DEFAULT_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&declaration_pattern(&[DEFAULT_CONFIGURATION])).unwrap());

/// `config("lit")` or `config 'lit'` for any of the given configuration names
fn declaration_pattern<S: AsRef<str>>(configurations: &[S]) -> String {
    let names = configurations
        .iter()
        .map(|c| regex::escape(c.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    format!(r#"\b(?:{})\b\s*\(?\s*(?:'([^'\n]*)'|"([^"\n]*)")"#, names)
}

/// A declared coordinate before version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCoordinate {
    /// `group:artifact`
    pub coordinate: String,
    /// Raw text after the rightmost colon; empty when there is no version segment
    pub version_token: String,
}

impl DependencyCoordinate {
    /// Split a dependency literal at its rightmost colon.
    ///
    /// A literal with fewer than two colons has no version segment: the whole
    /// literal is the coordinate and the token is empty.
    pub fn parse(literal: &str) -> Self {
        let literal = literal.trim();
        match literal.rsplit_once(':') {
            Some((coordinate, token)) if coordinate.contains(':') => Self {
                coordinate: coordinate.to_string(),
                version_token: token.trim().to_string(),
            },
            _ => Self {
                coordinate: literal.to_string(),
                version_token: String::new(),
            },
        }
    }

    pub fn token(&self) -> VersionToken<'_> {
        VersionToken::classify(&self.version_token)
    }

    /// Resolve the version token against `variables`
    pub fn resolve(self, variables: &VariableTable) -> ResolvedDependency {
        let version = self.token().resolve(variables);
        ResolvedDependency {
            coordinate: self.coordinate,
            version,
        }
    }
}

/// Classified version segment of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionToken<'a> {
    /// No version segment
    Missing,
    /// `$name` or `${name}`; holds the bare name
    Reference(&'a str),
    /// A literal version used verbatim
    Literal(&'a str),
}

impl<'a> VersionToken<'a> {
    pub fn classify(token: &'a str) -> Self {
        if token.is_empty() {
            return VersionToken::Missing;
        }
        match token.strip_prefix('$') {
            Some(rest) => {
                let name = rest
                    .strip_prefix('{')
                    .and_then(|r| r.strip_suffix('}'))
                    .unwrap_or(rest);
                VersionToken::Reference(name)
            }
            None => VersionToken::Literal(token),
        }
    }

    /// `None` only for a reference to an undefined variable
    pub fn resolve(self, variables: &VariableTable) -> Option<String> {
        match self {
            VersionToken::Missing => Some(UNKNOWN_DEPENDENCY_VERSION.to_string()),
            VersionToken::Reference(name) => variables.get(name).map(str::to_string),
            VersionToken::Literal(version) => Some(version.to_string()),
        }
    }
}

/// A dependency after version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: String,
    /// `None` when the version referenced an undefined variable
    pub version: Option<String>,
}

/// Lazy sequence of dependency literals in one block
#[derive(Debug, Clone)]
pub struct DependencyMatches<'r, 'a> {
    cursor: CaptureCursor<'r, 'a>,
}

impl Iterator for DependencyMatches<'_, '_> {
    type Item = DependencyCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.cursor.next()?;
        let literal = caps.get(1).or_else(|| caps.get(2))?;
        Some(DependencyCoordinate::parse(literal.as_str()))
    }
}

/// Extracts dependencies declared under a fixed set of configurations
#[derive(Debug, Clone)]
pub struct DependencyExtractor {
    declaration: Regex,
}

impl Default for DependencyExtractor {
    fn default() -> Self {
        Self {
            declaration: DEFAULT_DECLARATION.clone(),
        }
    }
}

impl DependencyExtractor {
    /// Match declarations under any of `configurations` (e.g. `implementation`, `api`)
    pub fn new<S: AsRef<str>>(configurations: &[S]) -> Result<Self> {
        if configurations.is_empty() {
            return Err(GradleMetaError::Config(
                "At least one dependency configuration is required".to_string(),
            ));
        }
        let declaration = Regex::new(&declaration_pattern(configurations)).map_err(|e| {
            GradleMetaError::Config(format!("Invalid dependency configuration: {}", e))
        })?;
        Ok(Self { declaration })
    }

    /// Raw coordinates in declaration order
    pub fn matches<'r, 'a>(&'r self, block: &'a str) -> DependencyMatches<'r, 'a> {
        DependencyMatches {
            cursor: CaptureCursor::new(&self.declaration, block),
        }
    }

    /// Extract `coordinate -> version` from the first `dependencies {}` block.
    ///
    /// A coordinate declared more than once keeps its last version.
    pub fn extract(
        &self,
        text: &str,
        variables: &VariableTable,
    ) -> BTreeMap<String, Option<String>> {
        let Some(block) = dependencies_block(text) else {
            return BTreeMap::new();
        };
        self.matches(block)
            .map(|coordinate| coordinate.resolve(variables))
            .map(|dep| (dep.coordinate, dep.version))
            .collect()
    }
}

/// Body of the first `dependencies {}` block, if any
pub fn dependencies_block(text: &str) -> Option<&str> {
    find_block(text, &DEPENDENCIES_BLOCK)
}

/// Extract `implementation` dependencies with the default configuration set
pub fn extract_dependencies(
    text: &str,
    variables: &VariableTable,
) -> BTreeMap<String, Option<String>> {
    DependencyExtractor::default().extract(text, variables)
}
