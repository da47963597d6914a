use pretty_assertions::assert_eq;
use serde_json::json;

use std::sync::{Arc, Mutex, OnceLock};

use super::{ok, user_json, Harness, MockMessage, ScriptedBackend};
use crate::{
    assert_any,
    callbacks::{ConsoleEventHandler, Notice, SESSION_EXPIRED},
    client::{pipeline::TOKEN_HEADER, ClientConfiguration, DormClient},
    error::ClientError,
    model::{RouteName, StoreKey},
    persistence::SecurePersistentStore,
};

#[tokio::test]
async fn login_persists_session_and_lands_on_main() {
    let harness = Harness::new();
    harness.backend.reply(ok(user_json("ADMIN", "tok-1")));

    let user = harness
        .client
        .login("A001".into(), "secret".into())
        .await
        .expect("login");

    assert_eq!(user.token.as_deref(), Some("tok-1"));
    assert!(harness.store.get(StoreKey::User.into()).is_some());
    assert_eq!(harness.client.current_user(), Some(user));
    assert_eq!(
        harness.client.current_route().map(|e| e.route),
        Some(RouteName::Main)
    );

    let request = harness.backend.last();
    assert_eq!(request.path, "/user/login");
    assert_eq!(request.header(TOKEN_HEADER), None);
    assert_eq!(
        request.body,
        Some(json!({ "id": "A001", "password": "secret" }))
    );
}

#[tokio::test]
async fn rejected_login_leaves_session_absent() {
    let harness = Harness::new();
    harness
        .backend
        .reply(json!({ "code": 400, "msg": "wrong password", "data": null }));

    let err = harness
        .client
        .login("A001".into(), "nope".into())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Application { code: 400, ref message, .. } if message == "wrong password"));
    assert_eq!(harness.client.current_user(), None);
    assert!(harness.events.messages().is_empty());
}

#[tokio::test]
async fn login_without_token_is_not_a_session() {
    let harness = Harness::new();
    harness.backend.reply(ok(json!({ "userId": 1, "role": "ADMIN" })));

    let err = harness
        .client
        .login("A001".into(), "secret".into())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SessionCorrupt { .. }));
    assert_eq!(harness.client.current_user(), None);
}

#[tokio::test]
async fn calls_carry_the_token() {
    let harness = Harness::logged_in("ADMIN").await;
    harness.backend.reply(ok(json!([])));

    let users = harness.client.all_users().await.expect("users");

    assert!(users.is_empty());
    assert_eq!(harness.backend.last().header(TOKEN_HEADER), Some("tok-1"));
}

#[tokio::test]
async fn expired_session_logs_out_and_redirects() {
    let harness = Harness::logged_in("ADMIN").await;
    harness.client.navigate("/main/users".into()).expect("admin page");
    harness
        .backend
        .reply(json!({ "code": 401, "msg": "token expired", "data": null }));

    let err = harness.client.all_users().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(harness.client.current_user(), None);
    assert!(harness.store.get(StoreKey::User.into()).is_none());
    assert_eq!(
        harness.client.current_route().map(|e| e.route),
        Some(RouteName::Login)
    );
    assert_any!(harness.events, |m| m
        == &MockMessage::Notice(Notice::session_expired()));
    assert_any!(harness.events, |m| m == &MockMessage::Redirect(RouteName::Login));
    assert_eq!(Notice::session_expired().message, SESSION_EXPIRED);
}

#[tokio::test]
async fn http_401_is_an_expiry_too() {
    let harness = Harness::logged_in("STUDENT").await;
    harness
        .backend
        .reply_with_status(401, json!({ "error": "Unauthorized" }));

    let err = harness.client.top_message(1).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(harness.client.current_user(), None);
}

#[tokio::test]
async fn failures_do_not_touch_the_session() {
    let harness = Harness::logged_in("ADMIN").await;
    harness
        .backend
        .reply(json!({ "code": 500, "msg": "dorm name taken", "data": null }))
        .fail("connection refused");

    let err = harness.client.add_dorm("East 1".into()).await.unwrap_err();
    assert_eq!(err.payload().map(|p| p.contains("dorm name taken")), Some(true));

    let err = harness.client.add_dorm("East 1".into()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));

    assert!(harness.client.current_user().is_some());
    assert!(harness.events.messages().is_empty());
}

#[tokio::test]
async fn logout_returns_to_login() {
    let harness = Harness::logged_in("STUDENT").await;
    harness.client.navigate("/main/msg".into()).expect("board");

    harness.client.logout();

    assert_eq!(harness.client.current_user(), None);
    assert_eq!(
        harness.client.current_route().map(|e| e.route),
        Some(RouteName::Login)
    );

    // the board needs a session again
    harness.client.navigate("/main/msg".into()).expect("redirect");
    assert_eq!(
        harness.client.current_route().map(|e| e.route),
        Some(RouteName::Login)
    );
}

#[tokio::test]
async fn student_is_bounced_from_admin_pages() {
    let harness = Harness::logged_in("STUDENT").await;

    let landed = harness
        .client
        .navigate("/main/dorm".into())
        .expect("redirect");

    assert_eq!(landed.route, RouteName::Main);
    assert_eq!(
        harness.events.messages(),
        vec![
            MockMessage::Notice(Notice::access_denied()),
            MockMessage::Redirect(RouteName::Main),
        ]
    );
}

#[tokio::test]
async fn corrupt_session_is_dropped_and_login_recovers() {
    let harness = Harness::new();
    harness
        .store
        .set(StoreKey::User.into(), b"{not json".to_vec());

    let landed = harness.client.navigate("/".into()).expect("login page");
    assert_eq!(landed.route, RouteName::Login);

    let err = harness
        .client
        .login("A001".into(), "secret".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::SessionCorrupt { .. }));
    assert!(harness.backend.requests().is_empty());
    assert!(harness.store.get(StoreKey::User.into()).is_none());

    harness.backend.reply(ok(user_json("ADMIN", "tok-3")));
    let user = harness
        .client
        .login("A001".into(), "secret".into())
        .await
        .expect("second login");

    assert_eq!(user.token.as_deref(), Some("tok-3"));
    assert_eq!(harness.backend.last().header(TOKEN_HEADER), None);
    assert_eq!(
        harness.client.current_route().map(|e| e.route),
        Some(RouteName::Main)
    );
}

#[tokio::test]
async fn expiry_on_login_page_keeps_history_flat() {
    let harness = Harness::new();
    harness.client.navigate("/".into()).expect("login page");
    harness
        .backend
        .reply(json!({ "code": 401, "msg": "not logged in", "data": null }));

    let err = harness.client.top_message(1).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(harness.client.history().len(), 1);
    assert_any!(harness.events, |m| m == &MockMessage::Redirect(RouteName::Login));
}

#[tokio::test]
async fn login_tolerates_null_fields() {
    let harness = Harness::new();
    harness.backend.reply(ok(json!({
        "userId": 2,
        "name": "Zhang San",
        "id": "S002",
        "role": "STUDENT",
        "phone": null,
        "gender": null,
        "birth": null,
        "lastLogin": null,
        "token": "tok-4"
    })));

    let user = harness
        .client
        .login("S002".into(), "secret".into())
        .await
        .expect("login");

    assert_eq!(user.phone, "");
    assert_eq!(user.gender, "");
    assert_eq!(user.birth, None);
}

/// Looks at the client from inside its own callbacks.
#[derive(Default)]
struct Reentrant {
    client: OnceLock<Arc<DormClient>>,
    seen: Mutex<Vec<Option<RouteName>>>,
}

impl ConsoleEventHandler for Reentrant {
    fn on_notice(&self, _notice: Notice) {
        if let Some(client) = self.client.get() {
            let route = client.current_route().map(|e| e.route);
            self.seen.lock().unwrap().push(route);
        }
    }

    fn on_redirect(&self, route: RouteName) {
        if let Some(client) = self.client.get() {
            let current = client.current_route().map(|e| e.route);
            assert_eq!(current, Some(route));
        }
    }
}

#[tokio::test]
async fn handlers_may_call_back_into_the_client() {
    let handler = Arc::new(Reentrant::default());
    let config = ClientConfiguration {
        event_handler: Some(handler.clone() as Arc<dyn ConsoleEventHandler>),
        ..Default::default()
    };
    let client = Arc::new(DormClient::with_transport(
        config,
        Arc::new(ScriptedBackend::default()),
    ));
    let _ = handler.client.set(client.clone());

    let landed = client.navigate("/main/msg".into()).expect("redirect");

    assert_eq!(landed.route, RouteName::Login);
    assert_eq!(*handler.seen.lock().unwrap(), vec![Some(RouteName::Login)]);
}
