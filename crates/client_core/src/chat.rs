use std::sync::Arc;

use shared::{
    domain::ChatMessage,
    protocol::{ChatRequest, ChatResponse},
};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::{
    error::GatewayError,
    events::{ClientEvent, Panel},
    gateway::RequestGateway,
    paths,
    transport::{ApiRequest, Transport},
    DraftOutcome,
};

pub const GREETING: &str =
    "Hi! I can manage your mini-Jira. Try: 'create ticket Login for Alice'";
pub const FAILURE_PREFIX: &str = "⚠️ ";
pub const FAILURE_FALLBACK: &str = "Failed to reach backend";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    pub transcript: Vec<ChatMessage>,
    pub draft: String,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            transcript: vec![ChatMessage::assistant(GREETING)],
            draft: String::new(),
        }
    }
}

/// Conversation with the admin agent.
///
/// Unlike tickets and users, the operator's own message is echoed before
/// the service answers and is never taken back; only the assistant's turn
/// depends on the outcome.
pub struct ChatController {
    gateway: RequestGateway,
    state: Mutex<ChatState>,
    events: broadcast::Sender<ClientEvent>,
}

impl ChatController {
    pub fn new(transport: Arc<dyn Transport>, events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            gateway: RequestGateway::new(Panel::Chat, transport, events.clone()),
            state: Mutex::new(ChatState::default()),
            events,
        }
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    pub async fn snapshot(&self) -> ChatState {
        self.state.lock().await.clone()
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().await.transcript.clone()
    }

    pub async fn draft(&self) -> String {
        self.state.lock().await.draft.clone()
    }

    pub async fn set_draft(&self, draft: impl Into<String>) {
        self.state.lock().await.draft = draft.into();
    }

    pub async fn send_draft(&self) -> Result<DraftOutcome, GatewayError> {
        let draft = self.state.lock().await.draft.clone();
        self.send(&draft).await
    }

    /// Echoes `text`, asks the agent, and appends exactly one assistant
    /// turn: the reply on success, a failure notice otherwise.
    pub async fn send(&self, text: &str) -> Result<DraftOutcome, GatewayError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(DraftOutcome::Incomplete);
        }

        {
            let mut guard = self.state.lock().await;
            guard.draft.clear();
            self.push(&mut guard, ChatMessage::user(text));
        }

        let request = ApiRequest::post(paths::CHAT).json(&ChatRequest {
            message: text.to_string(),
        });
        let result = match request {
            Ok(request) => self.gateway.call::<ChatResponse>(request).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(response) => {
                debug!(steps = response.steps.is_some(), "agent replied");
                self.append(ChatMessage::assistant(response.reply_text()))
                    .await;
                Ok(DraftOutcome::Submitted)
            }
            Err(err) => {
                let reason = self
                    .gateway
                    .last_error()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| FAILURE_FALLBACK.to_string());
                self.append(ChatMessage::assistant(format!("{FAILURE_PREFIX}{reason}")))
                    .await;
                Err(err)
            }
        }
    }

    async fn append(&self, message: ChatMessage) {
        let mut guard = self.state.lock().await;
        self.push(&mut guard, message);
    }

    // Publishing under the state lock keeps event order equal to transcript order.
    fn push(&self, state: &mut ChatState, message: ChatMessage) {
        state.transcript.push(message.clone());
        let _ = self.events.send(ClientEvent::ChatAppended(message));
    }
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;
