//! Provider preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scmd_protocols::ProviderKind;

use crate::error::ConfigError;

/// Which provider the user asked for, if any.
///
/// An explicit preference is honored literally: no fallback to the other
/// provider happens when it fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PreferredProvider {
    #[default]
    None,
    Ollama,
    Gemini,
}

impl PreferredProvider {
    pub fn kind(&self) -> Option<ProviderKind> {
        match self {
            Self::None => None,
            Self::Ollama => Some(ProviderKind::Ollama),
            Self::Gemini => Some(ProviderKind::Gemini),
        }
    }
}

impl FromStr for PreferredProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(ConfigError::InvalidValue {
                field: "agent".to_string(),
                message: format!("unknown provider '{}', expected ollama or gemini", other),
            }),
        }
    }
}

impl TryFrom<String> for PreferredProvider {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PreferredProvider> for String {
    fn from(value: PreferredProvider) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PreferredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}", kind),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!("".parse::<PreferredProvider>().unwrap(), PreferredProvider::None);
        assert_eq!("Ollama".parse::<PreferredProvider>().unwrap(), PreferredProvider::Ollama);
        assert_eq!(" gemini ".parse::<PreferredProvider>().unwrap(), PreferredProvider::Gemini);
    }

    #[test]
    fn test_parse_unknown_value() {
        let err = "openai".parse::<PreferredProvider>().unwrap_err();
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(PreferredProvider::None.kind(), None);
        assert_eq!(PreferredProvider::Gemini.kind(), Some(ProviderKind::Gemini));
    }
}
