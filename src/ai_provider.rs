use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;

use crate::core::{CompiledRequest, EngineError, RequestKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIProvider {
    Gemini,
    OpenAI,
    Ollama,
}

impl std::fmt::Display for AIProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AIProvider::Gemini => write!(f, "gemini"),
            AIProvider::OpenAI => write!(f, "openai"),
            AIProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for AIProvider {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(AIProvider::Gemini),
            "openai" | "gpt" => Ok(AIProvider::OpenAI),
            "ollama" => Ok(AIProvider::Ollama),
            _ => Err(EngineError::Config(format!("Unknown AI provider: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIConfig {
    pub provider: AIProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            provider: AIProvider::Gemini,
            api_key: None,
            base_url: None,
            max_tokens: Some(8192),
        }
    }
}

/// Anything that can run a compiled request and hand back the raw reply text.
pub trait CompletionClient {
    fn complete(&self, request: &CompiledRequest) -> impl Future<Output = Result<String>> + Send;
}

pub struct AIProviderClient {
    config: AIConfig,
    http_client: reqwest::Client,
}

const GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const OPENAI_URL: &str = "https://api.openai.com";
const OLLAMA_URL: &str = "http://localhost:11434";

impl AIProviderClient {
    pub fn new(config: AIConfig) -> Self {
        let http_client = reqwest::Client::new();

        AIProviderClient {
            config,
            http_client,
        }
    }

    pub fn get_provider(&self) -> AIProvider {
        self.config.provider
    }

    fn base_url(&self) -> &str {
        let default = match self.config.provider {
            AIProvider::Gemini => GEMINI_URL,
            AIProvider::OpenAI => OPENAI_URL,
            AIProvider::Ollama => OLLAMA_URL,
        };
        self.config
            .base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                EngineError::CompletionRequestFailed(format!("{} API key required", self.config.provider))
            })
    }

    async fn send(&self, request: &CompiledRequest) -> Result<String> {
        let body = request_body(self.config.provider, request, self.config.max_tokens);
        let builder = match self.config.provider {
            AIProvider::Gemini => self
                .http_client
                .post(format!("{}/v1beta/models/{}:generateContent", self.base_url(), request.model))
                .header("x-goog-api-key", self.api_key()?),
            AIProvider::OpenAI => self
                .http_client
                .post(format!("{}/v1/chat/completions", self.base_url()))
                .header("Authorization", format!("Bearer {}", self.api_key()?)),
            AIProvider::Ollama => self
                .http_client
                .post(format!("{}/api/chat", self.base_url())),
        };

        tracing::debug!(provider = %self.config.provider, model = %request.model, kind = ?request.kind, "sending completion request");

        let response = builder
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::CompletionRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::CompletionRequestFailed(format!(
                "{} API error ({}): {}",
                self.config.provider, status, error_text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| EngineError::CompletionRequestFailed(e.to_string()))?;

        extract_text(self.config.provider, &response_json)
    }
}

impl CompletionClient for AIProviderClient {
    async fn complete(&self, request: &CompiledRequest) -> Result<String> {
        self.send(request).await
    }
}

fn schema_name(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Content => "generation_result",
        RequestKind::Reply => "reply",
        RequestKind::Calendar => "calendar_result",
    }
}

/// Provider-specific JSON body for `request`.
pub fn request_body(provider: AIProvider, request: &CompiledRequest, max_tokens: Option<u32>) -> Value {
    match provider {
        AIProvider::Gemini => {
            let mut generation_config = serde_json::Map::new();
            if let Some(schema) = &request.schema {
                generation_config.insert("responseMimeType".into(), json!("application/json"));
                generation_config.insert("responseSchema".into(), schema.to_gemini());
            }
            if let Some(temperature) = request.temperature {
                generation_config.insert("temperature".into(), json!(temperature));
            }
            if let Some(max) = max_tokens {
                generation_config.insert("maxOutputTokens".into(), json!(max));
            }
            json!({
                "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
                "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
                "generationConfig": generation_config,
            })
        }
        AIProvider::OpenAI => {
            let mut body = json!({
                "model": request.model,
                "messages": [
                    { "role": "system", "content": request.system_instruction },
                    { "role": "user", "content": request.prompt },
                ],
            });
            if let Some(schema) = &request.schema {
                body["response_format"] = json!({
                    "type": "json_schema",
                    "json_schema": { "name": schema_name(request.kind), "schema": schema.to_json_schema() },
                });
            }
            if let Some(temperature) = request.temperature {
                body["temperature"] = json!(temperature);
            }
            if let Some(max) = max_tokens {
                body["max_tokens"] = json!(max);
            }
            body
        }
        AIProvider::Ollama => {
            let mut body = json!({
                "model": request.model,
                "messages": [
                    { "role": "system", "content": request.system_instruction },
                    { "role": "user", "content": request.prompt },
                ],
                "stream": false,
            });
            if let Some(schema) = &request.schema {
                body["format"] = schema.to_json_schema();
            }
            if let Some(temperature) = request.temperature {
                body["options"] = json!({ "temperature": temperature });
            }
            body
        }
    }
}

/// Pull the generated text out of a provider response envelope.
pub fn extract_text(provider: AIProvider, response: &Value) -> Result<String> {
    let text = match provider {
        AIProvider::Gemini => response["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            }),
        AIProvider::OpenAI => response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string),
        AIProvider::Ollama => response["message"]["content"].as_str().map(str::to_string),
    };

    text.ok_or_else(|| {
        EngineError::CompletionRequestFailed(format!("Invalid {} response format", provider))
    })
}
