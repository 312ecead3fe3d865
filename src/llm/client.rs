//! HTTP client for schema-constrained chat completions.
//!
//! Speaks the OpenAI chat completions API (also served by Groq and
//! Together.ai) and the Ollama chat API.

mod config;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub use config::{LlmConfig, LlmProvider};

use super::{TaskError, TaskSchema};

/// Longest slice of an upstream error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// One completion call: instructions, the user's text, and the reply schema.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    pub user_message: &'a str,
    pub schema: &'a TaskSchema,
}

/// Anything that can turn a [`CompletionRequest`] into raw reply text.
///
/// Implementations make exactly one outbound call per `complete` and never
/// retry.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short label for logs.
    fn label(&self) -> String;

    /// Return the model's reply content, unparsed.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TaskError>;
}

/// Completion client backed by a remote provider.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI chat completions request format.
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat<'a>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    error: Option<OpenAiError>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
}

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    format: &'a Value,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, TaskError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                TaskError::UpstreamUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        if config.provider == LlmProvider::OpenAI && config.api_key.is_none() {
            warn!("No API key configured for {}", config.endpoint);
        }

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(self.url(path));
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(self.url(path));
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn models_path(&self) -> &'static str {
        match self.config.provider {
            LlmProvider::OpenAI => "/v1/models",
            LlmProvider::Ollama => "/api/tags",
        }
    }

    /// Check if the completion service answers at all.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        match self.get(self.models_path()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List models offered by the provider.
    pub async fn list_models(&self) -> Result<Vec<String>, TaskError> {
        let resp = self
            .get(self.models_path())
            .send()
            .await
            .map_err(|e| TaskError::UpstreamUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TaskError::UpstreamUnavailable(format!(
                "HTTP {}",
                resp.status()
            )));
        }

        #[derive(Deserialize)]
        struct OpenAiModels {
            data: Vec<OpenAiModel>,
        }

        #[derive(Deserialize)]
        struct OpenAiModel {
            id: String,
        }

        #[derive(Deserialize)]
        struct OllamaTags {
            models: Vec<OllamaModel>,
        }

        #[derive(Deserialize)]
        struct OllamaModel {
            name: String,
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TaskError::MalformedResponse(e.to_string()))?;

        let names = match self.config.provider {
            LlmProvider::OpenAI => serde_json::from_str::<OpenAiModels>(&body)
                .map(|m| m.data.into_iter().map(|m| m.id).collect()),
            LlmProvider::Ollama => serde_json::from_str::<OllamaTags>(&body)
                .map(|t| t.models.into_iter().map(|m| m.name).collect()),
        };
        names.map_err(|e| TaskError::MalformedResponse(e.to_string()))
    }

    /// POST a request body and return the response text of a 2xx reply.
    async fn send_json<B: Serialize>(&self, path: &str, body: &B) -> Result<String, TaskError> {
        let resp = self.post(path).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                TaskError::UpstreamUnavailable(format!(
                    "no reply within {}s",
                    self.config.timeout_secs
                ))
            } else {
                TaskError::UpstreamUnavailable(e.to_string())
            }
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| TaskError::MalformedResponse(format!("unreadable body: {}", e)))?;

        if !status.is_success() {
            return Err(TaskError::UpstreamUnavailable(format!(
                "HTTP {}: {}",
                status,
                clip(&text, MAX_ERROR_BODY_CHARS)
            )));
        }
        if text.trim().is_empty() {
            return Err(TaskError::MalformedResponse("empty body".to_string()));
        }
        Ok(text)
    }

    async fn complete_openai(&self, request: CompletionRequest<'_>) -> Result<String, TaskError> {
        let body = OpenAiRequest {
            model: &self.config.model,
            messages: messages(&request),
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema.name(),
                    strict: true,
                    schema: request.schema.schema(),
                },
            },
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let text = self.send_json("/v1/chat/completions", &body).await?;
        let parsed: OpenAiResponse = serde_json::from_str(&text)
            .map_err(|e| TaskError::MalformedResponse(format!("body is not JSON: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(TaskError::UpstreamUnavailable(error.message));
        }

        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| TaskError::MalformedResponse("no choices in reply".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(TaskError::MalformedResponse(format!(
                "model refused: {}",
                refusal
            )));
        }

        match message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(TaskError::MalformedResponse(
                "no content in reply".to_string(),
            )),
        }
    }

    async fn complete_ollama(&self, request: CompletionRequest<'_>) -> Result<String, TaskError> {
        let body = OllamaRequest {
            model: &self.config.model,
            messages: messages(&request),
            stream: false,
            format: request.schema.schema(),
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let text = self.send_json("/api/chat", &body).await?;
        let parsed: OllamaResponse = serde_json::from_str(&text)
            .map_err(|e| TaskError::MalformedResponse(format!("body is not JSON: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(TaskError::UpstreamUnavailable(error));
        }

        match parsed.message {
            Some(message) if !message.content.trim().is_empty() => Ok(message.content),
            _ => Err(TaskError::MalformedResponse(
                "no content in reply".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    fn label(&self) -> String {
        format!("{}:{}", self.config.provider.as_str(), self.config.model)
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, TaskError> {
        if !self.config.enabled {
            return Err(TaskError::UpstreamUnavailable(
                "LLM is disabled".to_string(),
            ));
        }

        debug!(
            "Requesting '{}' from {} ({} + {} chars)",
            request.schema.name(),
            self.config.endpoint,
            request.system_prompt.len(),
            request.user_message.len()
        );

        match self.config.provider {
            LlmProvider::OpenAI => self.complete_openai(request).await,
            LlmProvider::Ollama => self.complete_ollama(request).await,
        }
    }
}

fn messages<'a>(request: &CompletionRequest<'a>) -> [ChatMessage<'a>; 2] {
    [
        ChatMessage {
            role: "system",
            content: request.system_prompt,
        },
        ChatMessage {
            role: "user",
            content: request.user_message,
        },
    ]
}

/// Truncate to at most `max` characters (UTF-8 safe).
fn clip(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn schema() -> TaskSchema {
        TaskSchema::new(
            "answer",
            json!({
                "type": "object",
                "properties": { "answer": { "type": "string" } },
                "required": ["answer"],
                "additionalProperties": false
            }),
        )
        .unwrap()
    }

    fn client(server: &MockServer, provider: LlmProvider) -> LlmClient {
        let config = LlmConfig::base_default()
            .with_provider(provider)
            .with_endpoint(&server.uri())
            .with_api_key("sk-test");
        LlmClient::new(config).unwrap()
    }

    fn openai_reply(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    async fn ask(client: &LlmClient) -> Result<String, TaskError> {
        let schema = schema();
        client
            .complete(CompletionRequest {
                system_prompt: "You answer questions.",
                user_message: "Is it wet?",
                schema: &schema,
            })
            .await
    }

    #[tokio::test]
    async fn test_openai_sends_strict_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "response_format": {
                    "type": "json_schema",
                    "json_schema": { "name": "answer", "strict": true }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply(r#"{"answer":"Yes"}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let content = ask(&client(&server, LlmProvider::OpenAI)).await.unwrap();
        assert_eq!(content, r#"{"answer":"Yes"}"#);
    }

    #[tokio::test]
    async fn test_openai_http_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = ask(&client(&server, LlmProvider::OpenAI)).await.unwrap_err();
        assert!(matches!(err, TaskError::UpstreamUnavailable(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = ask(&client(&server, LlmProvider::OpenAI)).await.unwrap_err();
        assert!(matches!(err, TaskError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = ask(&client(&server, LlmProvider::OpenAI)).await.unwrap_err();
        assert!(matches!(err, TaskError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_refusal_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": null, "refusal": "I can't help with that." } }]
            })))
            .mount(&server)
            .await;

        let err = ask(&client(&server, LlmProvider::OpenAI)).await.unwrap_err();
        assert!(err.to_string().contains("refused"));
    }

    #[tokio::test]
    async fn test_ollama_uses_chat_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "stream": false,
                "format": { "type": "object", "required": ["answer"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "{\"answer\":\"No\"}" },
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let content = ask(&client(&server, LlmProvider::Ollama)).await.unwrap();
        assert_eq!(content, "{\"answer\":\"No\"}");
    }

    #[tokio::test]
    async fn test_unreachable_is_upstream() {
        let config = LlmConfig::base_default().with_endpoint("http://127.0.0.1:1");
        let err = ask(&LlmClient::new(config).unwrap()).await.unwrap_err();
        assert!(matches!(err, TaskError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_disabled_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = LlmConfig::base_default().with_endpoint(&server.uri());
        config.enabled = false;
        let err = ask(&LlmClient::new(config).unwrap()).await.unwrap_err();
        assert!(matches!(err, TaskError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_list_models_per_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "gpt-4o-mini" }, { "id": "gpt-4o" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "llama3.1:8b" }]
            })))
            .mount(&server)
            .await;

        let openai = client(&server, LlmProvider::OpenAI);
        assert_eq!(openai.list_models().await.unwrap(), vec!["gpt-4o-mini", "gpt-4o"]);
        assert!(openai.is_available().await);

        let ollama = client(&server, LlmProvider::Ollama);
        assert_eq!(ollama.list_models().await.unwrap(), vec!["llama3.1:8b"]);
    }

    #[test]
    fn test_clip_is_char_safe() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("hi", 10), "hi");
    }
}
