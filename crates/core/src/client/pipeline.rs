//! Request and response interceptors as an explicit, ordered list of stages.
//!
//! A request runs through every [RequestStage] before it is handed to the
//! transport, the completed exchange then runs through every [ResponseStage].
//! Any stage may settle the call early; the first one to do so wins.
use std::{collections::BTreeMap, fmt, sync::Arc};

use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::Value;

use super::inner::Transport;
use crate::{
    callbacks::{ConsoleEventHandler, Notice},
    error::ClientError,
    model::RouteName,
    session::SessionContext,
};

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "token";
/// Application code for success.
pub const CODE_OK: i64 = 200;
/// Application code for a missing or expired session.
pub const CODE_UNAUTHORIZED: i64 = 401;

#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method: reqwest::Method = (*self).into();
        f.write_str(method.as_str())
    }
}

/// One outbound call, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub method: Method,
    /// Path plus optional query string, e.g. `/user/1/10`.
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends `query` url-encoded to the path.
    pub fn with_query<Q: Serialize>(mut self, query: &Q) -> Result<Self, ClientError> {
        let encoded = serde_urlencoded::to_string(query)?;
        if !encoded.is_empty() {
            let sep = if self.path.contains('?') { '&' } else { '?' };
            self.path.push(sep);
            self.path.push_str(&encoded);
        }
        Ok(self)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// What the transport saw come back, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// A server answer with the application envelope pulled apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status line code.
    pub status: u16,
    /// Application code from the body, or the HTTP status when the body has none.
    pub code: i64,
    pub message: String,
    /// The domain payload, `Null` when absent.
    pub data: Value,
    /// The body as received.
    pub raw: String,
}

impl Reply {
    pub fn from_raw(response: RawResponse) -> Self {
        let raw = String::from_utf8_lossy(&response.body).into_owned();
        let parsed = serde_json::from_slice::<Value>(&response.body).ok();

        let envelope_code = parsed
            .as_ref()
            .and_then(|body| body.get("code"))
            .and_then(Value::as_i64);

        match (envelope_code, parsed) {
            (Some(code), Some(mut body)) => {
                let message = ["errMsg", "msg", "message"]
                    .iter()
                    .find_map(|key| body.get(*key).and_then(Value::as_str))
                    .unwrap_or_default()
                    .to_owned();
                let data = body
                    .get_mut("data")
                    .map(Value::take)
                    .unwrap_or(Value::Null);
                Self {
                    status: response.status,
                    code,
                    message,
                    data,
                    raw,
                }
            }
            (_, parsed) => {
                trace!("Response without envelope, falling back to HTTP status");
                Self {
                    status: response.status,
                    code: i64::from(response.status),
                    message: raw.clone(),
                    data: parsed.unwrap_or(Value::Null),
                    raw,
                }
            }
        }
    }
}

/// A completed exchange: either the server answered or the call never got there.
#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    Received(Reply),
    Failed { message: String },
}

pub enum Flow<T> {
    /// Hand the (possibly modified) value to the next stage.
    Continue(T),
    /// Stop here, this is the call's result.
    Settle(Result<Value, ClientError>),
}

pub trait RequestStage: Send + Sync {
    fn on_request(&self, request: RequestEnvelope) -> Flow<RequestEnvelope>;
}

pub trait ResponseStage: Send + Sync {
    fn on_response(&self, exchange: Exchange) -> Flow<Exchange>;
}

/// Sets the `token` header from the persisted session.
pub struct AttachToken {
    session: SessionContext,
}

impl AttachToken {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }
}

impl RequestStage for AttachToken {
    fn on_request(&self, mut request: RequestEnvelope) -> Flow<RequestEnvelope> {
        match self.session.load() {
            Ok(Some(session)) => {
                request
                    .headers
                    .insert(TOKEN_HEADER.to_owned(), session.token().to_owned());
                Flow::Continue(request)
            }
            Ok(None) => {
                request.headers.remove(TOKEN_HEADER);
                Flow::Continue(request)
            }
            Err(e) => {
                warn!("Not sending {} {}: {e}", request.method, request.path);
                // the record is unusable either way, drop it so the next
                // login starts clean
                self.session.clear();
                Flow::Settle(Err(e.into()))
            }
        }
    }
}

/// Turns a call that never reached the server into [ClientError::Transport].
pub struct TransportFailure;

impl ResponseStage for TransportFailure {
    fn on_response(&self, exchange: Exchange) -> Flow<Exchange> {
        match exchange {
            Exchange::Failed { message } => Flow::Settle(Err(ClientError::Transport { message })),
            received => Flow::Continue(received),
        }
    }
}

/// Tears the session down when the backend reports it expired.
///
/// Concurrent expiries each run the teardown; clearing is idempotent, the
/// host may see the notice and redirect more than once.
pub struct SessionExpiry {
    session: SessionContext,
    events: Option<Arc<dyn ConsoleEventHandler>>,
}

impl SessionExpiry {
    pub fn new(session: SessionContext, events: Option<Arc<dyn ConsoleEventHandler>>) -> Self {
        Self { session, events }
    }
}

impl ResponseStage for SessionExpiry {
    fn on_response(&self, exchange: Exchange) -> Flow<Exchange> {
        let reply = match exchange {
            Exchange::Received(reply) if reply.code == CODE_UNAUTHORIZED => reply,
            other => return Flow::Continue(other),
        };

        debug!("Backend reported an expired session, logging out");
        self.session.clear();
        if let Some(events) = &self.events {
            events.on_notice(Notice::session_expired());
            events.on_redirect(RouteName::Login);
        }

        Flow::Settle(Err(ClientError::Unauthorized {
            code: reply.code,
            message: reply.message,
            payload: reply.raw,
        }))
    }
}

/// Resolves successful replies with just the domain payload.
pub struct UnwrapSuccess;

impl ResponseStage for UnwrapSuccess {
    fn on_response(&self, exchange: Exchange) -> Flow<Exchange> {
        match exchange {
            Exchange::Received(reply) if reply.code == CODE_OK => Flow::Settle(Ok(reply.data)),
            other => Flow::Continue(other),
        }
    }
}

/// Rejects whatever reaches it with the raw payload.
pub struct RejectFailure;

impl ResponseStage for RejectFailure {
    fn on_response(&self, exchange: Exchange) -> Flow<Exchange> {
        match exchange {
            Exchange::Received(reply) => Flow::Settle(Err(ClientError::Application {
                code: reply.code,
                message: reply.message,
                payload: reply.raw,
            })),
            Exchange::Failed { message } => Flow::Settle(Err(ClientError::Transport { message })),
        }
    }
}

#[derive(Default, Clone)]
pub struct Pipeline {
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("request_stages", &self.request_stages.len())
            .field("response_stages", &self.response_stages.len())
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token injection on the way out; transport failure, expiry, success,
    /// rejection on the way back, in that order.
    pub fn standard(session: SessionContext, events: Option<Arc<dyn ConsoleEventHandler>>) -> Self {
        Self::new()
            .with_request_stage(AttachToken::new(session.clone()))
            .with_response_stage(TransportFailure)
            .with_response_stage(SessionExpiry::new(session, events))
            .with_response_stage(UnwrapSuccess)
            .with_response_stage(RejectFailure)
    }

    pub fn with_request_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.request_stages.push(Arc::new(stage));
        self
    }

    pub fn with_response_stage(mut self, stage: impl ResponseStage + 'static) -> Self {
        self.response_stages.push(Arc::new(stage));
        self
    }

    /// Runs the request stages. `Err` holds the settled result of a stage
    /// that stopped the call before it was sent.
    pub fn prepare(
        &self,
        mut request: RequestEnvelope,
    ) -> Result<RequestEnvelope, Result<Value, ClientError>> {
        for stage in &self.request_stages {
            match stage.on_request(request) {
                Flow::Continue(next) => request = next,
                Flow::Settle(result) => return Err(result),
            }
        }
        Ok(request)
    }

    /// Runs the response stages over a completed exchange.
    pub fn complete(&self, mut exchange: Exchange) -> Result<Value, ClientError> {
        for stage in &self.response_stages {
            match stage.on_response(exchange) {
                Flow::Continue(next) => exchange = next,
                Flow::Settle(result) => return result,
            }
        }

        // only reachable with a custom pipeline lacking a terminal stage
        match exchange {
            Exchange::Received(reply) => Err(ClientError::Application {
                code: reply.code,
                message: reply.message,
                payload: reply.raw,
            }),
            Exchange::Failed { message } => Err(ClientError::Transport { message }),
        }
    }

    /// Sends `request` through the stages and `transport`.
    pub async fn run(
        &self,
        transport: &dyn Transport,
        request: RequestEnvelope,
    ) -> Result<Value, ClientError> {
        let request = match self.prepare(request) {
            Ok(request) => request,
            Err(settled) => return settled,
        };

        debug!("{} {}", request.method, request.path);
        let exchange = match transport.execute(&request).await {
            Ok(response) => Exchange::Received(Reply::from_raw(response)),
            Err(ClientError::Transport { message }) => Exchange::Failed { message },
            Err(other) => return Err(other),
        };

        self.complete(exchange)
    }
}
