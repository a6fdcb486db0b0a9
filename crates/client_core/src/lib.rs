//! Client-side synchronization layer for the Mini-Jira admin bridge.
//!
//! Three independent controllers (chat, tickets, users) each own a local
//! cache and a [`RequestGateway`]; all of them talk to the service through
//! one shared [`Transport`].

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

pub mod chat;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod paths;
pub mod tickets;
pub mod transport;
pub mod users;

pub use chat::{ChatController, ChatState};
pub use config::{load_settings, ConfigError, Settings};
pub use error::GatewayError;
pub use events::{ClientEvent, Panel};
pub use gateway::{RequestGateway, RequestStatus};
pub use tickets::{TicketDraft, TicketsController, TicketsState};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use users::{UserDraft, UsersController, UsersState};

const EVENT_CAPACITY: usize = 256;

/// Result of submitting a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOutcome {
    Submitted,
    /// A required field was missing; no request was made.
    Incomplete,
}

pub struct MiniJiraClient {
    chat: ChatController,
    tickets: TicketsController,
    users: UsersController,
    events: broadcast::Sender<ClientEvent>,
}

impl MiniJiraClient {
    pub fn new(settings: &Settings) -> Result<Arc<Self>, GatewayError> {
        let transport = HttpTransport::new(&settings.api_base)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            chat: ChatController::new(Arc::clone(&transport), events.clone()),
            tickets: TicketsController::new(Arc::clone(&transport), events.clone()),
            users: UsersController::new(transport, events.clone()),
            events,
        })
    }

    /// Initial reads for the ticket and user panels. Failures are recorded
    /// on the owning panel and do not stop the other load.
    pub async fn load_initial(&self) {
        let (tickets, users) = tokio::join!(self.tickets.reload(), self.users.reload());
        if let Err(err) = tickets {
            warn!(error = %err, "initial ticket load failed");
        }
        if let Err(err) = users {
            warn!(error = %err, "initial user load failed");
        }
    }

    pub fn chat(&self) -> &ChatController {
        &self.chat
    }

    pub fn tickets(&self) -> &TicketsController {
        &self.tickets
    }

    pub fn users(&self) -> &UsersController {
        &self.users
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
