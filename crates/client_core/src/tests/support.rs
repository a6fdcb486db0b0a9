//! Scripted transport for driving controllers without a network.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::{
    error::GatewayError,
    transport::{ApiRequest, ApiResponse, Transport},
};

#[derive(Clone)]
enum Canned {
    Response(ApiResponse),
    Unreachable(String),
}

impl Canned {
    fn into_result(self) -> Result<ApiResponse, GatewayError> {
        match self {
            Self::Response(response) => Ok(response),
            Self::Unreachable(message) => Err(GatewayError::Transport(message)),
        }
    }
}

enum Reply {
    Ready(Canned),
    Gated(oneshot::Receiver<ApiResponse>),
}

type Route = (Method, String);

/// Replies are matched on method and path (including the query string).
/// Queued replies are consumed first, then the route's standing reply;
/// unknown routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    queued: Mutex<HashMap<Route, VecDeque<Reply>>>,
    standing: Mutex<HashMap<Route, Canned>>,
    requests: Mutex<Vec<ApiRequest>>,
}

pub fn json_response(status: StatusCode, body: Value) -> ApiResponse {
    ApiResponse {
        status,
        body: serde_json::to_vec(&body).expect("encode test body"),
    }
}

pub fn ok(body: Value) -> ApiResponse {
    json_response(StatusCode::OK, body)
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always(&self, method: Method, path: &str, response: ApiResponse) {
        self.standing
            .lock()
            .expect("standing lock")
            .insert((method, path.to_string()), Canned::Response(response));
    }

    pub fn once(&self, method: Method, path: &str, response: ApiResponse) {
        self.push(method, path, Reply::Ready(Canned::Response(response)));
    }

    pub fn unreachable_once(&self, method: Method, path: &str, message: &str) {
        self.push(
            method,
            path,
            Reply::Ready(Canned::Unreachable(message.to_string())),
        );
    }

    /// Queues a reply that is held back until the returned sender fires.
    pub fn gate(&self, method: Method, path: &str) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| &request.method == method && request.path == path)
            .count()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.queued
            .lock()
            .expect("queued lock")
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let route = (request.method.clone(), request.path.clone());
        self.requests.lock().expect("requests lock").push(request);

        let queued = self
            .queued
            .lock()
            .expect("queued lock")
            .get_mut(&route)
            .and_then(VecDeque::pop_front);
        let reply = match queued {
            Some(reply) => reply,
            None => match self.standing.lock().expect("standing lock").get(&route) {
                Some(canned) => Reply::Ready(canned.clone()),
                None => Reply::Ready(Canned::Response(json_response(
                    StatusCode::NOT_FOUND,
                    serde_json::json!({"detail": "Not Found"}),
                ))),
            },
        };

        match reply {
            Reply::Ready(canned) => canned.into_result(),
            Reply::Gated(rx) => rx
                .await
                .map_err(|_| GatewayError::Transport("gate dropped".to_string())),
        }
    }
}
