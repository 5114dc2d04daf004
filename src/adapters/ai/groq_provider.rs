//! Groq Provider - Implementation of AiProvider for Groq's chat API.
//!
//! Groq exposes an OpenAI-compatible chat-completions endpoint; this
//! adapter translates between that wire format and the provider port.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(api_key)
//!     .with_model("llama3-70b-8192")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = GroqProvider::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, MessageRole, ProviderInfo,
};

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g. "llama3-70b-8192").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GroqConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama3-70b-8192".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Groq API provider implementation.
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    /// Creates a new Groq provider with the given configuration.
    pub fn new(config: GroqConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the chat-completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    /// Converts our request to Groq's wire format.
    ///
    /// The system instruction travels as the first message, per the
    /// OpenAI-compatible convention.
    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = &request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            let role = match msg.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(WireMessage {
                role: role.to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Sends a request and maps transport failures.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AiError> {
        let wire_request = self.to_wire_request(request);

        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AiError::network(format!("Connection failed: {}", e))
                } else {
                    AiError::network(e.to_string())
                }
            })
    }

    /// Maps the response status to the error taxonomy.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AiError::AuthenticationFailed),
            429 => Err(AiError::rate_limited(Self::parse_retry_after(&error_body))),
            400 => Err(AiError::InvalidRequest(error_body)),
            500..=599 => Err(AiError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AiError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after hints out of an error body.
    fn parse_retry_after(error_body: &str) -> u32 {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
            if let Some(s) = parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                if let Some(idx) = s.find("try again in ") {
                    let rest = &s[idx + 13..];
                    if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                        if let Ok(secs) = rest[..num_end].parse::<u32>() {
                            return secs;
                        }
                    }
                }
            }
        }
        30
    }

    /// Parses a successful response body.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AiError> {
        let response = self.handle_response_status(response).await?;

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(format!("Failed to parse response: {}", e)))?;

        let content = wire_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::parse("Response contained no choices"))?;

        Ok(CompletionResponse {
            content,
            model: wire_response.model,
        })
    }
}

#[async_trait]
impl AiProvider for GroqProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        let mut last_error = AiError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(&request).await {
                Ok(response) => match self.parse_response(response).await {
                    Ok(completion) => return Ok(completion),
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("groq", self.config.model.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::RequestMetadata;

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(SessionId::generate(), "trace"))
            .with_system_prompt("Be helpful")
            .with_message(MessageRole::User, "first")
            .with_message(MessageRole::Assistant, "second")
            .with_message(MessageRole::User, "third")
            .with_max_tokens(256)
            .with_temperature(0.1)
    }

    #[test]
    fn wire_request_puts_system_prompt_first() {
        let provider = GroqProvider::new(GroqConfig::new("gsk-test"));
        let wire = provider.to_wire_request(&test_request());

        assert_eq!(wire.model, "llama3-70b-8192");
        assert_eq!(wire.messages.len(), 4);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[0].content, "Be helpful");
        assert_eq!(wire.messages[1].role, "user");
        assert_eq!(wire.messages[2].role, "assistant");
        assert_eq!(wire.messages[3].content, "third");
        assert_eq!(wire.max_tokens, Some(256));
    }

    #[test]
    fn wire_request_serializes_without_absent_options() {
        let provider = GroqProvider::new(GroqConfig::new("gsk-test"));
        let request =
            CompletionRequest::new(RequestMetadata::new(SessionId::generate(), "trace"))
                .with_message(MessageRole::User, "hi");
        let json = serde_json::to_string(&provider.to_wire_request(&request)).unwrap();

        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn completions_url_is_under_openai_path() {
        let provider = GroqProvider::new(GroqConfig::new("gsk-test"));
        assert_eq!(
            provider.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn parse_retry_after_reads_hint_or_defaults() {
        let body = r#"{"error":{"message":"Rate limit reached, try again in 7s"}}"#;
        assert_eq!(GroqProvider::parse_retry_after(body), 7);
        assert_eq!(GroqProvider::parse_retry_after("not json"), 30);
    }

    #[test]
    fn wire_response_parses_first_choice() {
        let body = r#"{
            "model": "llama3-70b-8192",
            "choices": [{"message": {"role": "assistant", "content": "Take rest."}}]
        }"#;
        let parsed: WireResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Take rest.");
    }

    #[test]
    fn provider_info_names_groq() {
        let provider = GroqProvider::new(GroqConfig::new("gsk-test").with_model("mixtral-8x7b"));
        let info = provider.provider_info();
        assert_eq!(info.name, "groq");
        assert_eq!(info.model, "mixtral-8x7b");
    }
}
