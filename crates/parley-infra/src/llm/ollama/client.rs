//! OllamaProvider -- [`LlmProvider`] for a local or remote Ollama server.
//!
//! Sends the whole transcript to `/api/chat` with streaming disabled and
//! returns the single assistant message.

use std::time::Duration;

use parley_core::llm::provider::LlmProvider;
use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{
    OllamaChatRequest, OllamaChatResponse, OllamaErrorResponse, OllamaMessage, OllamaOptions,
};

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a provider for `base_url` (trailing slash tolerated).
    pub fn new(base_url: &str, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn to_ollama_request(&self, request: &CompletionRequest) -> OllamaChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| OllamaMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        }));

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        OllamaChatRequest {
            model,
            messages,
            stream: false,
            options: request.temperature.map(|t| OllamaOptions {
                temperature: Some(t),
            }),
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_ollama_request(request);

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<OllamaErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);

            return Err(match status.as_u16() {
                404 => LlmError::ModelNotFound(detail),
                429 => LlmError::RateLimited,
                400 => LlmError::InvalidRequest(detail),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {detail}"),
                },
            });
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(CompletionResponse {
            content: parsed.message.content,
            model: if parsed.model.is_empty() { body.model } else { parsed.model },
            usage: Usage {
                input_tokens: parsed.prompt_eval_count.unwrap_or(0),
                output_tokens: parsed.eval_count.unwrap_or(0),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use parley_types::llm::Message;
    use serde_json::{Value, json};

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Fake Ollama that describes the request it received in the reply.
    async fn fake_chat(Json(body): Json<Value>) -> Json<Value> {
        let messages = body["messages"].as_array().cloned().unwrap_or_default();
        let roles: Vec<&str> = messages.iter().filter_map(|m| m["role"].as_str()).collect();
        let last = messages
            .last()
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default();

        Json(json!({
            "model": body["model"],
            "message": {
                "role": "assistant",
                "content": format!(
                    "{}|{}|{}|{}",
                    roles.join(","),
                    last,
                    body["stream"],
                    body["options"]["temperature"]
                ),
            },
            "done": true,
            "prompt_eval_count": 12,
            "eval_count": 3,
        }))
    }

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("how are you?"),
            ],
            system: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_full_transcript() {
        let base = serve(Router::new().route("/api/chat", post(fake_chat))).await;
        let provider = OllamaProvider::new(&format!("{base}/"), "llama3".into(), Duration::from_secs(5)).unwrap();

        let response = provider.complete(&request("llama3")).await.unwrap();
        assert_eq!(response.content, "user,assistant,user|how are you?|false|null");
        assert_eq!(response.model, "llama3");
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 3);
    }

    #[tokio::test]
    async fn test_system_prompt_and_temperature() {
        let base = serve(Router::new().route("/api/chat", post(fake_chat))).await;
        let provider = OllamaProvider::new(&base, "llama3".into(), Duration::from_secs(5)).unwrap();

        let mut req = request("");
        req.system = Some("Be brief.".into());
        req.temperature = Some(0.5);

        let response = provider.complete(&req).await.unwrap();
        assert_eq!(response.content, "system,user,assistant,user|how are you?|false|0.5");
        assert_eq!(response.model, "llama3", "empty request model falls back to default");
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": "model \"nope\" not found, try pulling it first"})),
                )
            }),
        );
        let base = serve(router).await;
        let provider = OllamaProvider::new(&base, "nope".into(), Duration::from_secs(5)).unwrap();

        let err = provider.complete(&request("nope")).await.unwrap_err();
        match err {
            LlmError::ModelNotFound(detail) => assert!(detail.contains("try pulling it first")),
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_provider_error() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(router).await;
        let provider = OllamaProvider::new(&base, "llama3".into(), Duration::from_secs(5)).unwrap();

        let err = provider.complete(&request("llama3")).await.unwrap_err();
        assert!(err.to_string().contains("boom"), "{err}");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            OllamaProvider::new(&format!("http://{addr}"), "llama3".into(), Duration::from_secs(2)).unwrap();
        let err = provider.complete(&request("llama3")).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }
}
