//! Chat relay: one conversation turn against the language-model backend.
//!
//! ChatService loads the session transcript, appends the user's message,
//! sends the whole transcript to the backend, appends the reply, and writes
//! the transcript back. Nothing is persisted when the backend call fails.
//!
//! Two turns racing on the same session both read the same transcript and
//! the later write wins; there is no version check.

use std::time::Instant;

use parley_types::chat::Message;
use parley_types::error::RelayError;
use parley_types::identity::UserKey;
use parley_types::llm::CompletionRequest;
use tracing::{Instrument, info, info_span, warn};

use crate::llm::box_provider::BoxLlmProvider;
use crate::store::document::DocumentStore;

use super::sessions::SessionStore;

/// Per-request backend settings.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub system_prompt: Option<String>,
    pub temperature: Option<f64>,
}

impl ChatSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            temperature: None,
        }
    }
}

/// Relays chat turns between stored sessions and a `BoxLlmProvider`.
pub struct ChatService<S: DocumentStore> {
    sessions: SessionStore<S>,
    provider: BoxLlmProvider,
    settings: ChatSettings,
}

impl<S: DocumentStore> ChatService<S> {
    pub fn new(sessions: SessionStore<S>, provider: BoxLlmProvider, settings: ChatSettings) -> Self {
        Self {
            sessions,
            provider,
            settings,
        }
    }

    /// Access the session store.
    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    /// Name of the configured backend.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one turn and return the assistant's reply.
    ///
    /// Input is validated before any read, so invalid requests have no side
    /// effects. Backend failures surface as `RelayError::Upstream` and leave
    /// the stored transcript untouched.
    pub async fn chat(&self, email: &str, session_id: &str, message: &str) -> Result<String, RelayError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(RelayError::InvalidEmail);
        }
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(RelayError::MissingField("session_id"));
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(RelayError::MissingField("message"));
        }

        let key = UserKey::from_email(email)?;
        if !self.sessions.user_exists(&key).await? {
            return Err(RelayError::UserNotFound);
        }

        let session = self
            .sessions
            .load_session(&key, session_id)
            .await?
            .ok_or(RelayError::SessionNotFound)?;

        let mut transcript = session.messages;
        transcript.push(Message::user(message));

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: transcript,
            system: self.settings.system_prompt.clone(),
            temperature: self.settings.temperature,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            session_id = %session_id,
        );

        let started = Instant::now();
        let result = self.provider.complete(&request).instrument(span).await;
        let response_ms = started.elapsed().as_millis() as u64;

        let response = result.map_err(|e| {
            warn!(
                user = %key,
                session_id = %session_id,
                provider = self.provider.name(),
                error = %e,
                "Model backend call failed; transcript not saved"
            );
            RelayError::Upstream(e.to_string())
        })?;

        let reply = response.content;
        let mut transcript = request.messages;
        transcript.push(Message::assistant(reply.as_str()));

        self.sessions
            .save_transcript(&key, session_id, &transcript, &reply)
            .await?;

        info!(
            user = %key,
            session_id = %session_id,
            model = %response.model,
            messages = transcript.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            response_ms,
            "Chat turn completed"
        );

        Ok(reply)
    }
}
