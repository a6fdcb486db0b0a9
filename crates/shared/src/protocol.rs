//! Request and response bodies for each endpoint of the Mini-Jira bridge.
//!
//! Optional or missing fields are defaulted here so call sites never have to
//! second-guess the shape of a successful response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Ticket, TicketStatus, User, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatResponse {
    /// The agent's reply, or the whole response rendered as JSON when the
    /// service did not send a usable `reply`.
    pub fn reply_text(&self) -> String {
        match self.reply.as_deref() {
            Some(reply) if !reply.is_empty() => reply.to_string(),
            _ => serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketsResponse {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub assignee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TicketStatus,
}

/// `{ok: true}` acknowledgement returned by every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}
