//! Chat-completion service foundation.
#![allow(dead_code)] // Foundation module; insight screen wiring lands in a follow-up issue.

use reqwest::{Client, Request};
use serde::Serialize;
use thiserror::Error;

use crate::config::resolve_completion_model;
use crate::secret_store;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_OPENAI_BASE_URL: &str = "CRAVE_OPENAI_BASE_URL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETION_TEMPERATURE: f64 = 0.7;

#[derive(Clone, Debug, PartialEq, Eq)]
enum CompletionMode {
    Disabled,
    OpenAi {
        base_url: String,
        api_key: String,
        model: String,
    },
}

/// Basic configuration status for the completion service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionConfigStatus {
    pub enabled: bool,
    pub provider: &'static str,
    pub model: Option<String>,
}

/// Errors from completion service setup and requests.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completions are not configured. Add an OpenAI API key in Settings.")]
    NotConfigured,
    #[error("Invalid completion configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Completion request failed with status {0}")]
    UnexpectedStatus(u16),
}

type CompletionResult<T> = Result<T, CompletionError>;

/// Thin wrapper around the chat-completion HTTP API: one POST per call,
/// no retry, no streaming.
#[derive(Clone)]
pub struct CompletionService {
    client: Client,
    mode: CompletionMode,
}

#[derive(Debug, Serialize)]
struct CompletionRequestBody<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 1],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl CompletionService {
    /// Build the completion service from secure storage.
    ///
    /// In debug builds, `OPENAI_API_KEY` is allowed as a local fallback.
    pub fn new() -> CompletionResult<Self> {
        let mut api_key = secret_store::read_secret(secret_store::SECRET_OPENAI_API_KEY)
            .map_err(CompletionError::SecureStorage)?;

        #[cfg(debug_assertions)]
        if api_key.is_none() {
            api_key = std::env::var(ENV_OPENAI_API_KEY)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
        }

        let mode = if let Some(api_key) = api_key {
            let base_url = std::env::var(ENV_OPENAI_BASE_URL)
                .ok()
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

            if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
                return Err(CompletionError::InvalidConfiguration(
                    "CRAVE_OPENAI_BASE_URL must start with http:// or https://",
                ));
            }

            let model = resolve_completion_model()
                .model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string());

            CompletionMode::OpenAi {
                base_url,
                api_key,
                model,
            }
        } else {
            CompletionMode::Disabled
        };

        Ok(Self {
            client: Client::builder().build()?,
            mode,
        })
    }

    /// Persist the `OpenAI` API key into secure storage.
    pub fn store_api_key(raw_api_key: &str) -> CompletionResult<()> {
        let api_key = raw_api_key.trim();
        if api_key.is_empty() {
            return Err(CompletionError::InvalidConfiguration(
                "OpenAI API key must not be empty",
            ));
        }
        secret_store::write_secret(secret_store::SECRET_OPENAI_API_KEY, api_key)
            .map_err(CompletionError::SecureStorage)
    }

    /// Remove the `OpenAI` API key from secure storage.
    pub fn clear_api_key() -> CompletionResult<()> {
        secret_store::delete_secret(secret_store::SECRET_OPENAI_API_KEY)
            .map_err(CompletionError::SecureStorage)
    }

    /// Returns whether a secure `OpenAI` API key is currently stored.
    pub fn has_stored_api_key() -> CompletionResult<bool> {
        secret_store::has_secret(secret_store::SECRET_OPENAI_API_KEY)
            .map_err(CompletionError::SecureStorage)
    }

    #[must_use]
    pub fn config_status(&self) -> CompletionConfigStatus {
        match &self.mode {
            CompletionMode::Disabled => CompletionConfigStatus {
                enabled: false,
                provider: "none",
                model: None,
            },
            CompletionMode::OpenAi { model, .. } => CompletionConfigStatus {
                enabled: true,
                provider: "openai",
                model: Some(model.clone()),
            },
        }
    }

    /// Fetch one chat completion for `prompt` with the configured model.
    pub async fn fetch_completion(&self, prompt: &str) -> CompletionResult<Vec<u8>> {
        self.fetch_completion_with_model(prompt, None).await
    }

    /// Fetch one chat completion, returning the raw response body bytes.
    ///
    /// `model` overrides the configured model for this call. Any HTTP
    /// status outside [200, 300) is a fatal
    /// [`CompletionError::UnexpectedStatus`]; there is no retry.
    pub async fn fetch_completion_with_model(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> CompletionResult<Vec<u8>> {
        let request = self.build_completion_request(prompt, model)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::UnexpectedStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn build_completion_request(
        &self,
        prompt: &str,
        model_override: Option<&str>,
    ) -> CompletionResult<Request> {
        let (base_url, api_key, model) = match &self.mode {
            CompletionMode::Disabled => return Err(CompletionError::NotConfigured),
            CompletionMode::OpenAi {
                base_url,
                api_key,
                model,
            } => (base_url, api_key, model),
        };

        let endpoint = format!("{base_url}/v1/chat/completions");
        let body = CompletionRequestBody {
            model: model_override.unwrap_or(model),
            messages: [CompletionMessage {
                role: "user",
                content: prompt,
            }],
            temperature: COMPLETION_TEMPERATURE,
        };

        self.client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .build()
            .map_err(CompletionError::Http)
    }
}
