// Data types for the runtime module

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::RuntimeError;

/// Supported interpreter languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    NodeJs,
    Bash,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::NodeJs => "nodejs",
            Language::Bash => "bash",
        }
    }

    /// Detect the language from a filename extension
    pub fn detect(filename: &str) -> Option<Language> {
        let ext = Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "py" => Some(Language::Python),
            "js" | "mjs" => Some(Language::NodeJs),
            "sh" | "bash" => Some(Language::Bash),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Language::Python),
            "nodejs" => Ok(Language::NodeJs),
            "bash" => Ok(Language::Bash),
            other => Err(RuntimeError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Outcome of a single code execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Parsed JSON when stdout looks like a JSON document, raw trimmed
    /// stdout otherwise; null on failure
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub output: Value,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(Language::detect("script.py"), Some(Language::Python));
        assert_eq!(Language::detect("app.js"), Some(Language::NodeJs));
        assert_eq!(Language::detect("app.mjs"), Some(Language::NodeJs));
        assert_eq!(Language::detect("script.sh"), Some(Language::Bash));
        assert_eq!(Language::detect("script.bash"), Some(Language::Bash));
        assert_eq!(Language::detect("file.txt"), None);
        assert_eq!(Language::detect("file.go"), None);
        assert_eq!(Language::detect("noextension"), None);
    }

    #[test]
    fn test_detect_language_case_insensitive() {
        assert_eq!(Language::detect("SCRIPT.PY"), Some(Language::Python));
        assert_eq!(Language::detect("App.JS"), Some(Language::NodeJs));
    }

    #[test]
    fn test_language_round_trip() {
        for lang in [Language::Python, Language::NodeJs, Language::Bash] {
            assert_eq!(lang.as_str().parse::<Language>().unwrap(), lang);
        }
        assert!("ruby".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serde_tags() {
        assert_eq!(serde_json::to_string(&Language::NodeJs).unwrap(), "\"nodejs\"");
        let lang: Language = serde_json::from_str("\"bash\"").unwrap();
        assert_eq!(lang, Language::Bash);
    }
}
