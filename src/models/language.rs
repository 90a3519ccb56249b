//! Supported language set

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages accepted by the submission pipeline.
///
/// This is the single list shared by the sanitizer allow-list, the default
/// backend language-id table and the `/languages` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    Cpp,
    C,
    JavaScript,
    Go,
}

impl Language {
    /// All supported languages, in listing order
    pub const ALL: [Language; 6] = [
        Language::Java,
        Language::Python,
        Language::Cpp,
        Language::C,
        Language::JavaScript,
        Language::Go,
    ];

    /// Get language key as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Python => "python",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::JavaScript => "javascript",
            Self::Go => "go",
        }
    }

    /// Human-readable name and toolchain version
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Java => "Java (OpenJDK 13.0.1)",
            Self::Python => "Python (3.8.1)",
            Self::Cpp => "C++ (GCC 9.2.0)",
            Self::C => "C (GCC 9.2.0)",
            Self::JavaScript => "JavaScript (Node.js 12.14.0)",
            Self::Go => "Go (1.13.5)",
        }
    }

    /// Comma separated list of every supported key, for error messages
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(Language::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "java" => Ok(Self::Java),
            "python" => Ok(Self::Python),
            "cpp" => Ok(Self::Cpp),
            "c" => Ok(Self::C),
            "javascript" => Ok(Self::JavaScript),
            "go" => Ok(Self::Go),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Java".parse::<Language>(), Ok(Language::Java));
        assert_eq!("PYTHON".parse::<Language>(), Ok(Language::Python));
        assert_eq!("javascript".parse::<Language>(), Ok(Language::JavaScript));
        assert!("ruby".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn test_round_trip_through_as_str() {
        for language in Language::ALL {
            assert_eq!(language.as_str().parse::<Language>(), Ok(language));
        }
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let parsed: Language = serde_json::from_str("\"cpp\"").unwrap();
        assert_eq!(parsed, Language::Cpp);
    }
}
