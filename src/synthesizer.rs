use serde::de::DeserializeOwned;

use crate::ai_provider::CompletionClient;
use crate::core::{
    AppState, CalendarResult, CompiledRequest, EngineError, GenerationResult, KnowledgeEntry,
    RequestCompiler, Result,
};

/// Compiles requests, sends each exactly once and parses the reply.
pub struct Synthesizer<C> {
    compiler: RequestCompiler,
    client: C,
}

impl<C: CompletionClient> Synthesizer<C> {
    pub fn new(compiler: RequestCompiler, client: C) -> Self {
        Self { compiler, client }
    }

    pub fn compiler(&self) -> &RequestCompiler {
        &self.compiler
    }

    pub async fn generate_content(&self, state: &AppState) -> Result<GenerationResult> {
        let request = self.compiler.compile_content(state);
        self.structured(&request).await
    }

    pub async fn generate_reply(
        &self,
        inquiry: &str,
        knowledge: &[KnowledgeEntry],
        brand: &str,
    ) -> Result<String> {
        let request = self.compiler.compile_reply(inquiry, knowledge, brand);
        let text = self.client.complete(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::CompletionRequestFailed("empty reply".to_string()));
        }
        Ok(text.to_string())
    }

    pub async fn generate_calendar(&self, state: &AppState) -> Result<CalendarResult> {
        let request = self.compiler.compile_calendar(state);
        self.structured(&request).await
    }

    async fn structured<T: DeserializeOwned>(&self, request: &CompiledRequest) -> Result<T> {
        let text = self.client.complete(request).await?;
        parse_structured(request, &text)
    }
}

/// Validate `text` against the request's schema, then deserialize it.
pub fn parse_structured<T: DeserializeOwned>(request: &CompiledRequest, text: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(strip_fences(text))
        .map_err(|e| EngineError::ResponseSchemaMismatch(format!("reply is not JSON: {}", e)))?;
    if let Some(schema) = &request.schema {
        schema.validate(&value)?;
    }
    serde_json::from_value(value).map_err(|e| EngineError::ResponseSchemaMismatch(e.to_string()))
}

/// Some models wrap JSON in a markdown code fence even in JSON mode.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
