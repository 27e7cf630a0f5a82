pub mod gemini;
pub mod ollama;
pub mod openai;

use pdfqa_core::Config;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat backend selected by `LLM_PROVIDER`.
pub fn create_provider(config: &Config) -> Result<Box<dyn LlmProvider>, LlmError> {
    let llm_config = &config.llm;
    match llm_config.provider.as_str() {
        "gemini" => {
            let api_key = llm_config
                .google_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Ok(Box::new(gemini::GeminiProvider::new(
                api_key.clone(),
                llm_config.gemini_model.clone(),
            )))
        }
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            config.ollama.url.clone(),
            config.ollama.model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: std::collections::HashMap<&str, &str> = pairs.iter().copied().collect();
        Config::from_lookup("", &|key: &str| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn gemini_without_key_is_not_configured() {
        assert!(matches!(
            create_provider(&config(&[])),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn known_providers_are_created() {
        assert!(create_provider(&config(&[("GOOGLE_API_KEY", "k")])).is_ok());
        assert!(create_provider(&config(&[("LLM_PROVIDER", "ollama")])).is_ok());
        assert!(create_provider(&config(&[
            ("LLM_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "k"),
        ]))
        .is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(matches!(
            create_provider(&config(&[("LLM_PROVIDER", "palm")])),
            Err(LlmError::NotConfigured(_))
        ));
    }
}
