//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;
use crate::validator::ConfigValidator;

/// Configuration loader with environment variable substitution and overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Build the startup configuration: file (if present), process environment,
    /// then validation.
    pub fn resolve(path: &Path) -> Result<Config, ConfigError> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Config::default()
        };
        Self::apply_env(&mut config, |name| std::env::var(name).ok())?;

        let report = ConfigValidator::validate(&config);
        if !report.is_valid() {
            let messages: Vec<String> = report
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.path, e.message))
                .collect();
            return Err(ConfigError::Validation(messages.join("; ")));
        }
        Ok(config)
    }

    /// Apply environment overrides. Empty values count as unset.
    pub fn apply_env<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("SCMD_DB") {
            config.store.path = path;
        }
        if let Some(dim) = get("EMBEDDING_DIM") {
            config.embedding.dimension = parse_var("EMBEDDING_DIM", &dim)?;
        }
        if let Some(agent) = lookup("AGENT") {
            config.agent = agent.parse()?;
        }

        if let Some(host) = get("OLLAMA") {
            config.ollama.host = host;
        }
        if let Some(port) = get("OLLAMA_PORT") {
            config.ollama.port = parse_var("OLLAMA_PORT", &port)?;
        }
        if let Some(model) = get("MODEL") {
            config.ollama.model = model;
        }
        if let Some(model) = get("OLLAMA_EMBEDDING_MODEL") {
            config.ollama.embedding_model = Some(model);
        }

        if let Some(key) = get("GEMINIAPI") {
            config.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINIMODEL") {
            config.gemini.model = model;
        }
        if let Some(model) = get("GEMINI_EMBEDDING_MODEL") {
            config.gemini.embedding_model = model;
        }

        Ok(())
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.scmd`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// `~/.scmd/config.toml`, or a relative `.scmd/config.toml` without a home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".scmd")
            .join("config.toml")
    }
}

fn parse_var<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
