//! Configuration validation.

use crate::preferred::PreferredProvider;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_search(config, &mut result);
        Self::validate_embedding(config, &mut result);
        Self::validate_providers(config, &mut result);

        result
    }

    fn validate_search(config: &Config, result: &mut ValidationResult) {
        let search = &config.search;

        if search.high_threshold > 100 {
            result.add_error("search.high_threshold", "must be between 0 and 100");
        }
        if search.low_threshold > 100 {
            result.add_error("search.low_threshold", "must be between 0 and 100");
        }
        if search.low_threshold > search.high_threshold {
            result.add_error(
                "search.low_threshold",
                "must not be greater than search.high_threshold",
            );
        }
        if search.result_cap == 0 {
            result.add_error("search.result_cap", "must be greater than 0");
        }
        if search.context_cap == 0 {
            result.add_error("search.context_cap", "must be greater than 0");
        }
        if search.vector_limit == 0 {
            result.add_error("search.vector_limit", "must be greater than 0");
        }
    }

    fn validate_embedding(config: &Config, result: &mut ValidationResult) {
        if config.embedding.dimension == 0 {
            result.add_error("embedding.dimension", "must be greater than 0");
        } else if config.embedding.dimension > 8192 {
            result.add_warning("embedding.dimension", "unusually large embedding dimension");
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        if config.ollama.host.trim().is_empty() {
            result.add_error("ollama.host", "must not be empty");
        }
        if config.ollama.port == 0 {
            result.add_error("ollama.port", "must be greater than 0");
        }

        let timeouts = &config.timeouts;
        if timeouts.probe_secs == 0 || timeouts.embed_secs == 0 || timeouts.chat_secs == 0 {
            result.add_error("timeouts", "timeouts must be greater than 0");
        }

        if config.agent == PreferredProvider::Gemini && !config.gemini.has_api_key() {
            result.add_warning(
                "agent",
                "gemini is preferred but no API key is configured; AI answers will fail",
            );
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
