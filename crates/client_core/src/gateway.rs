use std::sync::Arc;

use serde::de::DeserializeOwned;
use shared::protocol::Ack;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::{
    error::GatewayError,
    events::{ClientEvent, Panel},
    transport::{ApiRequest, Transport},
};

/// In-flight flag and last error of one controller's gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub in_flight: bool,
    pub error: Option<String>,
}

/// Issues one call at a time on behalf of a controller and keeps its
/// [`RequestStatus`] current.
///
/// Calls are not queued: two overlapping calls each raise the flag on entry
/// and lower it on exit, whichever finishes first.
pub struct RequestGateway {
    panel: Panel,
    transport: Arc<dyn Transport>,
    status: watch::Sender<RequestStatus>,
    events: broadcast::Sender<ClientEvent>,
}

struct InFlight<'a> {
    status: &'a watch::Sender<RequestStatus>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.status.send_modify(|status| status.in_flight = false);
    }
}

impl RequestGateway {
    pub fn new(
        panel: Panel,
        transport: Arc<dyn Transport>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        let (status, _) = watch::channel(RequestStatus::default());
        Self {
            panel,
            transport,
            status,
            events,
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn status(&self) -> RequestStatus {
        self.status.borrow().clone()
    }

    pub fn in_flight(&self) -> bool {
        self.status.borrow().in_flight
    }

    pub fn last_error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    pub fn clear_error(&self) {
        self.status.send_modify(|status| status.error = None);
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestStatus> {
        self.status.subscribe()
    }

    /// Performs `request` and decodes a 2xx body into `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, GatewayError> {
        let _in_flight = self.begin();
        let method = request.method.clone();
        let path = request.path.clone();
        debug!(panel = %self.panel, %method, %path, "api call");

        match self.execute(request).await {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(panel = %self.panel, %method, %path, error = %err, "api call failed");
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Performs a mutation whose success body is `{ok: true}`.
    pub async fn call_ack(&self, request: ApiRequest) -> Result<(), GatewayError> {
        let path = request.path.clone();
        let ack: Ack = self.call(request).await?;
        if !ack.ok {
            warn!(panel = %self.panel, %path, "mutation acknowledged without ok=true");
        }
        Ok(())
    }

    fn begin(&self) -> InFlight<'_> {
        self.status.send_modify(|status| {
            status.in_flight = true;
            status.error = None;
        });
        InFlight {
            status: &self.status,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, GatewayError> {
        let response = self.transport.send(request).await?;
        if !response.status.is_success() {
            return Err(GatewayError::api(response.status));
        }
        serde_json::from_slice(&response.body).map_err(GatewayError::Decode)
    }

    fn record_failure(&self, err: &GatewayError) {
        let message = err.to_string();
        self.status
            .send_modify(|status| status.error = Some(message.clone()));
        let _ = self.events.send(ClientEvent::RequestFailed {
            panel: self.panel,
            message,
        });
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
