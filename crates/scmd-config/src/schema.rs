//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::preferred::PreferredProvider;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Preferred provider; empty means "try them in priority order".
    #[serde(default)]
    pub agent: PreferredProvider,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    "~/.scmd/scmd.db".to_string()
}

/// Score thresholds and result caps used by the search orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Keyword score at which results are returned without asking a provider.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: u32,

    /// Minimum keyword score for results returned with AI disabled.
    #[serde(default = "default_low_threshold")]
    pub low_threshold: u32,

    #[serde(default = "default_result_cap")]
    pub result_cap: usize,

    /// Keyword results passed to a chat call as context.
    #[serde(default = "default_context_cap")]
    pub context_cap: usize,

    #[serde(default = "default_vector_limit")]
    pub vector_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            high_threshold: default_high_threshold(),
            low_threshold: default_low_threshold(),
            result_cap: default_result_cap(),
            context_cap: default_context_cap(),
            vector_limit: default_vector_limit(),
        }
    }
}

pub const DEFAULT_HIGH_THRESHOLD: u32 = 60;
pub const DEFAULT_LOW_THRESHOLD: u32 = 25;
pub const DEFAULT_RESULT_CAP: usize = 10;
pub const DEFAULT_CONTEXT_CAP: usize = 5;

fn default_high_threshold() -> u32 {
    DEFAULT_HIGH_THRESHOLD
}

fn default_low_threshold() -> u32 {
    DEFAULT_LOW_THRESHOLD
}

fn default_result_cap() -> usize {
    DEFAULT_RESULT_CAP
}

fn default_context_cap() -> usize {
    DEFAULT_CONTEXT_CAP
}

fn default_vector_limit() -> usize {
    10
}

/// Embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Every vector is truncated or zero-padded to this length.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Pause between backfill records while the hosted provider is in use.
    #[serde(default = "default_backfill_delay_ms")]
    pub backfill_delay_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            backfill_delay_ms: default_backfill_delay_ms(),
        }
    }
}

fn default_dimension() -> usize {
    384
}

fn default_backfill_delay_ms() -> u64 {
    100
}

/// Local Ollama server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_host")]
    pub host: String,

    #[serde(default = "default_ollama_port")]
    pub port: u16,

    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Falls back to `model` when unset.
    #[serde(default)]
    pub embedding_model: Option<String>,
}

impl OllamaConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn embedding_model(&self) -> &str {
        self.embedding_model.as_deref().unwrap_or(&self.model)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            port: default_ollama_port(),
            model: default_ollama_model(),
            embedding_model: None,
        }
    }
}

fn default_ollama_host() -> String {
    "localhost".to_string()
}

fn default_ollama_port() -> u16 {
    11434
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

/// Hosted Gemini API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_embedding_model")]
    pub embedding_model: String,
}

impl GeminiConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            embedding_model: default_gemini_embedding_model(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_gemini_embedding_model() -> String {
    "embedding-001".to_string()
}

/// Provider call timeouts, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,

    #[serde(default = "default_embed_secs")]
    pub embed_secs: u64,

    #[serde(default = "default_chat_secs")]
    pub chat_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: default_probe_secs(),
            embed_secs: default_embed_secs(),
            chat_secs: default_chat_secs(),
        }
    }
}

fn default_probe_secs() -> u64 {
    2
}

fn default_embed_secs() -> u64 {
    30
}

fn default_chat_secs() -> u64 {
    60
}

/// Log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_dir() -> String {
    "~/.scmd/logs".to_string()
}

fn default_max_log_files() -> usize {
    7
}
