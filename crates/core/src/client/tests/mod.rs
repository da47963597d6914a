mod lifecycle;

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use serde_json::{json, Value};

use super::{
    pipeline::{RawResponse, RequestEnvelope},
    ClientConfiguration, DormClient, Transport,
};
use crate::{
    callbacks::{ConsoleEventHandler, Notice},
    error::ClientError,
    model::RouteName,
    persistence::{MemoryStore, SecurePersistentStore},
};

#[derive(Debug, Clone, PartialEq)]
pub enum MockMessage {
    Notice(Notice),
    Redirect(RouteName),
}

#[macro_export]
macro_rules! assert_any {
    ($store:expr, $predicate:expr) => {
        {
            let messages = $store.messages.lock().unwrap();
            assert!(
                messages.iter().any($predicate),
                "\nAssertion failed at {}:{}:{}\nMessage not found matching predicate.\nMessages:\n{:#?}",
                file!(),
                line!(),
                column!(),
                *messages
            );
        }
    };
}

#[derive(Default)]
pub struct MockMessageStore {
    messages: Mutex<Vec<MockMessage>>,
}

impl MockMessageStore {
    pub fn messages(&self) -> Vec<MockMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl ConsoleEventHandler for MockMessageStore {
    fn on_notice(&self, notice: Notice) {
        self.messages.lock().unwrap().push(MockMessage::Notice(notice));
    }

    fn on_redirect(&self, route: RouteName) {
        self.messages.lock().unwrap().push(MockMessage::Redirect(route));
    }
}

/// Plays back queued answers in order and records every request it is sent.
#[derive(Default)]
pub struct ScriptedBackend {
    answers: Mutex<VecDeque<Result<RawResponse, ClientError>>>,
    seen: Mutex<Vec<RequestEnvelope>>,
}

impl ScriptedBackend {
    pub fn reply(&self, body: Value) -> &Self {
        self.reply_with_status(200, body)
    }

    pub fn reply_with_status(&self, status: u16, body: Value) -> &Self {
        self.answers.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        }));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Transport {
                message: message.into(),
            }));
        self
    }

    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> RequestEnvelope {
        self.requests().pop().expect("no request was sent")
    }
}

impl Transport for ScriptedBackend {
    fn execute<'a>(
        &'a self,
        request: &'a RequestEnvelope,
    ) -> BoxFuture<'a, Result<RawResponse, ClientError>> {
        self.seen.lock().unwrap().push(request.clone());
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("backend ran out of answers");
        Box::pin(async move { answer })
    }
}

pub struct Harness {
    pub client: DormClient,
    pub backend: Arc<ScriptedBackend>,
    pub events: Arc<MockMessageStore>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        let backend = Arc::new(ScriptedBackend::default());
        let events = Arc::new(MockMessageStore::default());
        let store = Arc::new(MemoryStore::new());

        let config = ClientConfiguration {
            persistence_provider: Some(store.clone() as Arc<dyn SecurePersistentStore>),
            event_handler: Some(events.clone() as Arc<dyn ConsoleEventHandler>),
            ..Default::default()
        };
        let client = DormClient::with_transport(config, backend.clone());

        Self {
            client,
            backend,
            events,
            store,
        }
    }

    /// Logs in through the backend as a user with `role`.
    pub async fn logged_in(role: &str) -> Self {
        let harness = Self::new();
        harness.backend.reply(ok(user_json(role, "tok-1")));
        harness
            .client
            .login("A001".into(), "secret".into())
            .await
            .expect("login");
        harness
    }
}

pub fn ok(data: Value) -> Value {
    json!({ "code": 200, "msg": "success", "data": data })
}

pub fn user_json(role: &str, token: &str) -> Value {
    json!({
        "userId": 1,
        "name": "Li Lei",
        "id": "A001",
        "role": role,
        "phone": "13800000000",
        "gender": "male",
        "birth": "2001-05-04",
        "token": token
    })
}
