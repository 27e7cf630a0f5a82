use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PdfQaError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Source of raw setting values, keyed by variable name.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Profiled settings reader: tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
struct Settings<'a> {
    profile: &'a str,
    lookup: Lookup<'a>,
}

impl Settings<'_> {
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            let prefixed = format!("{}_{}", self.profile, key);
            if let Some(v) = (self.lookup)(&prefixed).filter(|s| !s.is_empty()) {
                return Some(v);
            }
        }
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub paths: PathsConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PDFQA_PROFILE`.
    pub fn from_env() -> Self {
        let profile = env::var("PDFQA_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, &|key: &str| env::var(key).ok())
    }

    /// Build config from an arbitrary key/value source.
    pub fn from_lookup(profile: &str, lookup: Lookup<'_>) -> Self {
        let profile = profile.to_uppercase();
        let s = Settings {
            profile: &profile,
            lookup,
        };
        Self {
            profile: profile.clone(),
            paths: PathsConfig::from_settings(&s),
            llm: LlmConfig::from_settings(&s),
            ollama: OllamaConfig::from_settings(&s),
            embedding: EmbeddingConfig::from_settings(&s),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Fail early when the selected providers are unknown or lack credentials.
    pub fn validate(&self) -> Result<(), PdfQaError> {
        self.llm.validate()?;
        self.embedding.validate(&self.llm)
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  paths:       docs={}, index={}", self.paths.docs_dir.display(), self.paths.index_dir.display());
        tracing::info!("  llm:         provider={}, model={}", self.llm.provider, self.llm.model_name(&self.ollama));
        tracing::info!("  embedding:   provider={}, model={}", self.embedding.provider, self.embedding.model_name(&self.ollama));
        tracing::info!("  ollama:      url={}", self.ollama.url);
    }
}

// ── Paths ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for `.pdf` files.
    pub docs_dir: PathBuf,
    /// Directory holding the vector index; deleted and rebuilt every run.
    pub index_dir: PathBuf,
}

impl PathsConfig {
    fn from_settings(s: &Settings<'_>) -> Self {
        Self {
            docs_dir: PathBuf::from(s.or("DOCS_PATH", "docs")),
            index_dir: PathBuf::from(s.or("INDEX_PATH", "vector_index")),
        }
    }
}

// ── LLM (Gemini / OpenAI / Ollama) ───────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "ollama"
    pub provider: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_settings(s: &Settings<'_>) -> Self {
        Self {
            provider: s.or("LLM_PROVIDER", "gemini").to_lowercase(),
            google_api_key: s.opt("GOOGLE_API_KEY"),
            gemini_model: s.or("GEMINI_MODEL", "gemini-1.5-flash"),
            openai_api_key: s.opt("OPENAI_API_KEY"),
            openai_model: s.or("OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: s.opt("OPENAI_BASE_URL"),
            temperature: s.f32_or("LLM_TEMPERATURE", 0.0),
            max_tokens: s.u32_or("LLM_MAX_TOKENS", 2048),
        }
    }

    pub fn model_name<'a>(&'a self, ollama: &'a OllamaConfig) -> &'a str {
        match self.provider.as_str() {
            "openai" => &self.openai_model,
            "ollama" => &ollama.model,
            _ => &self.gemini_model,
        }
    }

    fn validate(&self) -> Result<(), PdfQaError> {
        match self.provider.as_str() {
            "gemini" if self.google_api_key.is_none() => {
                Err(PdfQaError::NotConfigured("GOOGLE_API_KEY not set".into()))
            }
            "openai" if self.openai_api_key.is_none() => {
                Err(PdfQaError::NotConfigured("OPENAI_API_KEY not set".into()))
            }
            "gemini" | "openai" | "ollama" => Ok(()),
            other => Err(PdfQaError::InvalidSetting {
                key: "LLM_PROVIDER".into(),
                value: other.to_string(),
            }),
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_settings(s: &Settings<'_>) -> Self {
        Self {
            url: s.or("OLLAMA_URL", "http://localhost:11434"),
            model: s.or("OLLAMA_MODEL", "llama3.2"),
            embedding_model: s.or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "gemini", "openai", "ollama"
    pub provider: String,
    pub gemini_model: String,
    pub openai_model: String,
}

impl EmbeddingConfig {
    fn from_settings(s: &Settings<'_>) -> Self {
        Self {
            provider: s.or("EMBEDDING_PROVIDER", "gemini").to_lowercase(),
            gemini_model: s.or("GEMINI_EMBEDDING_MODEL", "models/embedding-001"),
            openai_model: s.or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
        }
    }

    pub fn model_name<'a>(&'a self, ollama: &'a OllamaConfig) -> &'a str {
        match self.provider.as_str() {
            "openai" => &self.openai_model,
            "ollama" => &ollama.embedding_model,
            _ => &self.gemini_model,
        }
    }

    /// Embedding backends share credentials with the chat backends.
    fn validate(&self, llm: &LlmConfig) -> Result<(), PdfQaError> {
        match self.provider.as_str() {
            "gemini" if llm.google_api_key.is_none() => {
                Err(PdfQaError::NotConfigured("GOOGLE_API_KEY not set".into()))
            }
            "openai" if llm.openai_api_key.is_none() => {
                Err(PdfQaError::NotConfigured("OPENAI_API_KEY not set".into()))
            }
            "gemini" | "openai" | "ollama" => Ok(()),
            other => Err(PdfQaError::InvalidSetting {
                key: "EMBEDDING_PROVIDER".into(),
                value: other.to_string(),
            }),
        }
    }
}
