use std::sync::Arc;

use shared::{
    domain::{StatusFilter, Ticket, TicketId, TicketStatus},
    protocol::{CreateTicketRequest, TicketsResponse, UpdateStatusRequest},
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub assignee: String,
}

impl TicketDraft {
    pub fn new(title: impl Into<String>, assignee: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            assignee: assignee.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.assignee.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketsState {
    pub tickets: Vec<Ticket>,
    pub status_filter: StatusFilter,
    pub draft: TicketDraft,
}

/// Owns the ticket table for the active status filter.
///
/// Every mutation is pessimistic: the cache only changes when the reload
/// that follows a confirmed mutation lands.
pub struct TicketsController {
    gateway: RequestGateway,
    state: Mutex<TicketsState>,
    events: broadcast::Sender<ClientEvent>,
}

impl TicketsController {
    pub fn new(transport: Arc<dyn Transport>, events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            gateway: RequestGateway::new(Panel::Tickets, transport, events.clone()),
            state: Mutex::new(TicketsState::default()),
            events,
        }
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    pub async fn snapshot(&self) -> TicketsState {
        self.state.lock().await.clone()
    }

    pub async fn tickets(&self) -> Vec<Ticket> {
        self.state.lock().await.tickets.clone()
    }

    pub async fn status_filter(&self) -> StatusFilter {
        self.state.lock().await.status_filter
    }

    pub async fn draft(&self) -> TicketDraft {
        self.state.lock().await.draft.clone()
    }

    pub async fn set_draft(&self, draft: TicketDraft) {
        self.state.lock().await.draft = draft;
    }

    /// Replaces the cache with the service's list for the current filter.
    /// On failure the previous cache is kept.
    pub async fn reload(&self) -> Result<(), GatewayError> {
        let filter = self.state.lock().await.status_filter;
        let response: TicketsResponse = self
            .gateway
            .call(ApiRequest::get(paths::tickets_with_status(filter)))
            .await?;

        let tickets = {
            let mut guard = self.state.lock().await;
            guard.tickets = response.tickets;
            guard.tickets.clone()
        };
        debug!(filter = %filter, count = tickets.len(), "tickets reloaded");
        let _ = self.events.send(ClientEvent::TicketsReloaded(tickets));
        Ok(())
    }

    /// Switches the filter and reloads. The filter stays switched even if
    /// the reload fails.
    pub async fn set_filter(&self, filter: StatusFilter) -> Result<(), GatewayError> {
        self.state.lock().await.status_filter = filter;
        self.reload().await
    }

    pub async fn create(&self) -> Result<DraftOutcome, GatewayError> {
        let draft = self.state.lock().await.draft.clone();
        if !draft.is_complete() {
            debug!("ticket draft incomplete; nothing sent");
            return Ok(DraftOutcome::Incomplete);
        }

        let request = ApiRequest::post(paths::TICKETS).json(&CreateTicketRequest {
            title: draft.title.clone(),
            assignee: draft.assignee.clone(),
        })?;
        self.gateway.call_ack(request).await?;
        info!(title = %draft.title, assignee = %draft.assignee, "ticket created");

        self.state.lock().await.draft = TicketDraft::default();
        self.reload().await?;
        Ok(DraftOutcome::Submitted)
    }

    pub async fn set_status(&self, id: TicketId, status: TicketStatus) -> Result<(), GatewayError> {
        let request = ApiRequest::patch(paths::ticket(id)).json(&UpdateStatusRequest { status })?;
        self.gateway.call_ack(request).await?;
        info!(ticket = %id, %status, "ticket status updated");
        self.reload().await
    }

    pub async fn remove(&self, id: TicketId) -> Result<(), GatewayError> {
        self.gateway
            .call_ack(ApiRequest::delete(paths::ticket(id)))
            .await?;
        info!(ticket = %id, "ticket deleted");
        self.reload().await
    }

    /// Wipes the whole backing store on the service, not just the
    /// filtered view.
    pub async fn reset_all(&self) -> Result<(), GatewayError> {
        self.gateway.call_ack(ApiRequest::post(paths::RESET)).await?;
        info!("ticket store reset");
        self.reload().await
    }
}

#[cfg(test)]
#[path = "tests/tickets_tests.rs"]
mod tests;
