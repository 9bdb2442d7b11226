use async_trait::async_trait;
use crate::llm::openai::{OpenAIAdapter, GROQ_API_BASE, OPENAI_API_BASE, OPENROUTER_API_BASE};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for the text-generation provider
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    /// Overrides the provider's default endpoint
    pub api_base: Option<String>,
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig) -> AppResult<Self> {
        let default_base = match provider.name.as_str() {
            "openai" => OPENAI_API_BASE,
            "groq" => GROQ_API_BASE,
            "openrouter" => OPENROUTER_API_BASE,
            other => {
                return Err(AppError::InvalidRequest(format!(
                    "Unsupported provider: {}",
                    other
                )))
            }
        };
        let api_base = provider.api_base.as_deref().unwrap_or(default_base);

        Ok(Self {
            adapter: Box::new(OpenAIAdapter::new_with_api_base(&provider.api_key, api_base)),
            provider_name: provider.name,
        })
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

#[async_trait]
impl LLMAdapter for LLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
