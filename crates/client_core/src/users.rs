use std::sync::Arc;

use shared::{
    domain::{User, UserId},
    protocol::{CreateUserRequest, UsersResponse},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use crate::{
    error::GatewayError,
    events::{ClientEvent, Panel},
    gateway::RequestGateway,
    paths,
    transport::{ApiRequest, Transport},
    DraftOutcome,
};

/// Raw operator input for a new user; `user_id` is coerced on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub user_id: String,
    pub name: String,
}

impl UserDraft {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
        }
    }

    /// The request body, or `None` when either field is missing. An id that
    /// is not an integer counts as missing.
    pub fn to_request(&self) -> Option<CreateUserRequest> {
        let user_id = self.user_id.trim().parse::<i64>().ok()?;
        if self.name.trim().is_empty() {
            return None;
        }
        Some(CreateUserRequest {
            user_id: UserId(user_id),
            name: self.name.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    pub users: Vec<User>,
    pub draft: UserDraft,
}

pub struct UsersController {
    gateway: RequestGateway,
    state: Mutex<UsersState>,
    events: broadcast::Sender<ClientEvent>,
}

impl UsersController {
    pub fn new(transport: Arc<dyn Transport>, events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            gateway: RequestGateway::new(Panel::Users, transport, events.clone()),
            state: Mutex::new(UsersState::default()),
            events,
        }
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    pub async fn snapshot(&self) -> UsersState {
        self.state.lock().await.clone()
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }

    pub async fn draft(&self) -> UserDraft {
        self.state.lock().await.draft.clone()
    }

    pub async fn set_draft(&self, draft: UserDraft) {
        self.state.lock().await.draft = draft;
    }

    pub async fn reload(&self) -> Result<(), GatewayError> {
        let response: UsersResponse = self.gateway.call(ApiRequest::get(paths::USERS)).await?;

        let users = {
            let mut guard = self.state.lock().await;
            guard.users = response.users;
            guard.users.clone()
        };
        debug!(count = users.len(), "users reloaded");
        let _ = self.events.send(ClientEvent::UsersReloaded(users));
        Ok(())
    }

    /// Duplicate ids are the service's call; its rejection comes back as
    /// an API error.
    pub async fn create(&self) -> Result<DraftOutcome, GatewayError> {
        let Some(body) = self.state.lock().await.draft.to_request() else {
            debug!("user draft incomplete; nothing sent");
            return Ok(DraftOutcome::Incomplete);
        };

        let request = ApiRequest::post(paths::USERS).json(&body)?;
        self.gateway.call_ack(request).await?;
        info!(user = %body.user_id, name = %body.name, "user created");

        self.state.lock().await.draft = UserDraft::default();
        self.reload().await?;
        Ok(DraftOutcome::Submitted)
    }

    pub async fn remove(&self, user_id: UserId) -> Result<(), GatewayError> {
        self.gateway
            .call_ack(ApiRequest::delete(paths::user(user_id)))
            .await?;
        info!(user = %user_id, "user deleted");
        self.reload().await
    }
}

#[cfg(test)]
#[path = "tests/users_tests.rs"]
mod tests;
