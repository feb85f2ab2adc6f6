//! Gradle wrapper properties (`gradle/wrapper/gradle-wrapper.properties`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DISTRIBUTION_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*distributionUrl[ \t]*=[ \t]*(.*?)[ \t]*\r?$").unwrap()
});

static GRADLE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gradle-(\d+(?:\.\d+)*)").unwrap());

/// Gradle runtime pinned by the wrapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperInfo {
    pub distribution_url: Option<String>,
    pub gradle_version: Option<String>,
}

impl WrapperInfo {
    pub fn is_empty(&self) -> bool {
        self.distribution_url.is_none() && self.gradle_version.is_none()
    }
}

/// Read `distributionUrl` and derive the Gradle version from it.
///
/// Properties files escape `:` as `\:`; the URL is returned unescaped. When
/// the URL does not name a `gradle-<version>` distribution the version stays
/// absent.
pub fn extract_wrapper(text: &str) -> WrapperInfo {
    let Some(raw) = DISTRIBUTION_URL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|value| !value.is_empty())
    else {
        return WrapperInfo::default();
    };

    let url = raw.replace("\\:", ":");
    let gradle_version = GRADLE_VERSION
        .captures(&url)
        .map(|caps| caps[1].to_string());

    WrapperInfo {
        distribution_url: Some(url),
        gradle_version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROPERTIES: &str = r"distributionBase=GRADLE_USER_HOME
distributionPath=wrapper/dists
distributionUrl=https\://services.gradle.org/distributions/gradle-7.4-bin.zip
networkTimeout=10000
zipStoreBase=GRADLE_USER_HOME
zipStorePath=wrapper/dists
";

    #[test]
    fn test_standard_properties() {
        let info = extract_wrapper(PROPERTIES);
        assert_eq!(
            info.distribution_url.as_deref(),
            Some("https://services.gradle.org/distributions/gradle-7.4-bin.zip")
        );
        assert_eq!(info.gradle_version.as_deref(), Some("7.4"));
    }

    #[test]
    fn test_missing_distribution_url() {
        let info = extract_wrapper("distributionBase=GRADLE_USER_HOME\n");
        assert!(info.is_empty());
        assert!(extract_wrapper("").is_empty());
    }

    #[test]
    fn test_url_without_version() {
        let info = extract_wrapper("distributionUrl=https\\://mirror.example.com/dist.zip\n");
        assert_eq!(
            info.distribution_url.as_deref(),
            Some("https://mirror.example.com/dist.zip")
        );
        assert_eq!(info.gradle_version, None);
    }

    #[test]
    fn test_three_part_version_and_all_distribution() {
        let info = extract_wrapper(
            "distributionUrl=https\\://services.gradle.org/distributions/gradle-8.5.1-all.zip",
        );
        assert_eq!(info.gradle_version.as_deref(), Some("8.5.1"));
    }

    #[test]
    fn test_crlf_and_whitespace() {
        let info = extract_wrapper(
            "zipStoreBase=GRADLE_USER_HOME\r\n  distributionUrl = https\\://services.gradle.org/distributions/gradle-8.0-rc-1-bin.zip \r\n",
        );
        assert_eq!(
            info.distribution_url.as_deref(),
            Some("https://services.gradle.org/distributions/gradle-8.0-rc-1-bin.zip")
        );
        assert_eq!(info.gradle_version.as_deref(), Some("8.0"));
    }

    #[test]
    fn test_commented_line_ignored() {
        let info = extract_wrapper("#distributionUrl=https\\://old/gradle-6.0-bin.zip\n");
        assert!(info.is_empty());
    }
}
