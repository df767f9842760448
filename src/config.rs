use std::path::{Path, PathBuf};
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};

use crate::ai_provider::{AIConfig, AIProvider};
use crate::core::{ModelSelection, RelevancePolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub default_provider: String,
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub relevance_policy: RelevancePolicy,
    /// Overrides the built-in brand name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub default_model: String,
    /// Lighter model for replies and calendars; falls back to `default_model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Environment variables consulted, in order, when a provider has no key.
fn key_env_vars(provider: &str) -> &'static [&'static str] {
    match provider {
        "gemini" => &["GEMINI_API_KEY", "API_KEY"],
        "openai" => &["OPENAI_API_KEY"],
        _ => &[],
    }
}

fn env_key(provider: &str) -> Option<String> {
    key_env_vars(provider)
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

impl Config {
    pub fn default_data_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("authority-engine")
    }

    /// Load `config.json` from the data directory, creating it with defaults
    /// when it does not exist yet.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(Self::default_data_dir);

        std::fs::create_dir_all(&data_dir)
            .context("Failed to create data directory")?;

        let config_path = data_dir.join("config.json");

        if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .context("Failed to read config.json")?;

            if config_str.trim().is_empty() {
                tracing::warn!("config file is empty, recreating defaults");
            } else {
                let mut config: Config = serde_json::from_str(&config_str)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))?;
                config.data_dir = data_dir;
                config.fill_keys_from_env();
                return Ok(config);
            }
        }

        let mut config = Self::default_config(data_dir);
        config.save()?;
        config.fill_keys_from_env();
        Ok(config)
    }

    /// Keys from the environment are used at runtime but never written back.
    fn fill_keys_from_env(&mut self) {
        for (name, provider) in self.providers.iter_mut() {
            if provider.api_key.as_ref().map_or(true, |key| key.is_empty()) {
                provider.api_key = env_key(name);
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = self.data_dir.join("config.json");
        let mut on_disk = self.clone();
        for (name, provider) in on_disk.providers.iter_mut() {
            if provider.api_key.is_some() && provider.api_key == env_key(name) {
                provider.api_key = None;
            }
        }
        let json_str = serde_json::to_string_pretty(&on_disk)
            .context("Failed to serialize config")?;
        std::fs::write(&config_path, json_str)
            .context("Failed to write config.json")?;
        Ok(())
    }

    fn default_config(data_dir: PathBuf) -> Self {
        let mut providers = HashMap::new();

        providers.insert("gemini".to_string(), ProviderConfig {
            default_model: "gemini-3-pro-preview".to_string(),
            fast_model: Some("gemini-3-flash-preview".to_string()),
            host: None,
            api_key: None,
            max_tokens: None,
        });

        providers.insert("openai".to_string(), ProviderConfig {
            default_model: "gpt-4o".to_string(),
            fast_model: Some("gpt-4o-mini".to_string()),
            host: None,
            api_key: None,
            max_tokens: None,
        });

        providers.insert("ollama".to_string(), ProviderConfig {
            default_model: "qwen2.5".to_string(),
            fast_model: None,
            host: Some("http://localhost:11434".to_string()),
            api_key: None,
            max_tokens: None,
        });

        Config {
            data_dir,
            default_provider: "gemini".to_string(),
            providers,
            relevance_policy: RelevancePolicy::default(),
            brand: None,
        }
    }

    pub fn get_provider(&self, provider_name: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider_name)
    }

    fn provider_name<'a>(&'a self, provider: Option<&'a str>) -> &'a str {
        provider.unwrap_or(&self.default_provider)
    }

    pub fn get_ai_config(&self, provider: Option<&str>) -> Result<AIConfig> {
        let provider_name = self.provider_name(provider);
        let provider_config = self.get_provider(provider_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown provider: {}", provider_name))?;

        let ai_provider: AIProvider = provider_name.parse()?;

        Ok(AIConfig {
            provider: ai_provider,
            api_key: provider_config.api_key.clone(),
            base_url: provider_config.host.clone(),
            max_tokens: provider_config.max_tokens.or(Some(8192)),
        })
    }

    /// Models for the chosen provider. An explicit `model` replaces both.
    pub fn get_models(&self, provider: Option<&str>, model: Option<String>) -> Result<ModelSelection> {
        let provider_name = self.provider_name(provider);
        let provider_config = self.get_provider(provider_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown provider: {}", provider_name))?;

        if let Some(model) = model {
            return Ok(ModelSelection { primary: model.clone(), fast: model });
        }
        Ok(ModelSelection {
            primary: provider_config.default_model.clone(),
            fast: provider_config
                .fast_model
                .clone()
                .unwrap_or_else(|| provider_config.default_model.clone()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_default_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.relevance_policy, RelevancePolicy::Advisory);
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn test_reads_existing_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "default_provider": "ollama",
                "relevance_policy": "strict",
                "brand": "Easy Visa",
                "providers": { "ollama": { "default_model": "llama3", "host": "http://box:11434" } }
            }"#,
        )
        .unwrap();
        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.relevance_policy, RelevancePolicy::Strict);
        assert_eq!(config.brand.as_deref(), Some("Easy Visa"));

        let ai = config.get_ai_config(None).unwrap();
        assert_eq!(ai.provider, AIProvider::Ollama);
        assert_eq!(ai.base_url.as_deref(), Some("http://box:11434"));

        let models = config.get_models(None, None).unwrap();
        assert_eq!(models.primary, "llama3");
        assert_eq!(models.fast, "llama3");
    }

    #[test]
    fn test_model_override_and_unknown_provider() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        let models = config.get_models(Some("gemini"), Some("gemini-x".to_string())).unwrap();
        assert_eq!(models.primary, "gemini-x");
        assert_eq!(models.fast, "gemini-x");
        assert!(config.get_ai_config(Some("claude")).is_err());
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ nope").unwrap();
        assert!(Config::new(Some(dir.path().to_path_buf())).is_err());
    }
}
