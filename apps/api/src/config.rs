use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub stt_model: String,
    pub enable_tts: bool,
    /// JSON file replacing the built-in evaluation heading table.
    pub evaluation_headings_path: Option<String>,
    pub ideal_response_default_language: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            llm_api_key: lookup("LLM_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("Required environment variable 'LLM_API_KEY' is not set")?,
            llm_base_url: var("LLM_BASE_URL", "https://api.openai.com"),
            llm_model: var("LLM_MODEL", "gpt-4o-mini"),
            tts_model: var("TTS_MODEL", "tts-1"),
            tts_voice: var("TTS_VOICE", "alloy"),
            stt_model: var("STT_MODEL", "whisper-1"),
            enable_tts: parse_bool(&var("ENABLE_TTS", "true"))
                .context("ENABLE_TTS must be true or false")?,
            evaluation_headings_path: lookup("EVALUATION_HEADINGS_PATH")
                .filter(|v| !v.trim().is_empty()),
            ideal_response_default_language: var("IDEAL_RESPONSE_DEFAULT_LANGUAGE", "text"),
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| (key == "LLM_API_KEY").then(|| "sk-test".to_string()))
            .expect("test config")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("LLM_API_KEY", "sk-1")])).unwrap();
        assert_eq!(config.llm_base_url, "https://api.openai.com");
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert!(config.enable_tts);
        assert_eq!(config.evaluation_headings_path, None);
        assert_eq!(config.ideal_response_default_language, "text");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("LLM_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_fails() {
        assert!(Config::from_lookup(lookup_from(&[("LLM_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk-1"),
            ("LLM_BASE_URL", "http://localhost:11434"),
            ("ENABLE_TTS", "off"),
            ("EVALUATION_HEADINGS_PATH", "/etc/headings.json"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.llm_base_url, "http://localhost:11434");
        assert!(!config.enable_tts);
        assert_eq!(config.evaluation_headings_path.as_deref(), Some("/etc/headings.json"));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = Config::from_lookup(lookup_from(&[("LLM_API_KEY", "sk-1"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_bool_fails() {
        assert!(Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk-1"),
            ("ENABLE_TTS", "maybe")
        ]))
        .is_err());
    }
}
