mod config;
pub mod endpoints;
pub(crate) mod inner;
pub mod pipeline;

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

pub use config::*;
pub use inner::{CredentialJar, HttpTransport, Transport};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use self::{
    inner::init_log,
    pipeline::{Pipeline, RequestEnvelope},
};
use crate::{
    callbacks::*,
    error::ClientError,
    model::{RouteName, User},
    persistence::{MemoryStore, SecurePersistentStore},
    router::{Navigator, RouteTable},
    session::SessionContext,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A configuration interface for building a [DormClient].
///
/// Without a persistence provider the session lasts only as long as the
/// client. See [DormClientBuilder::set_persistence_provider]
#[derive(uniffi::Object, Default)]
pub struct DormClientBuilder {
    config: Mutex<ClientConfiguration>,
}

#[uniffi::export]
impl DormClientBuilder {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            config: Default::default(),
        }
    }

    /// Provides the [DormClient] with a place to keep the session and cookies.
    pub fn set_persistence_provider(&self, provider: Box<dyn SecurePersistentStore>) {
        lock(&self.config).persistence_provider = Some(provider.into());
    }

    /// Receives user facing notices and redirect requests.
    pub fn set_event_handler(&self, handler: Box<dyn ConsoleEventHandler>) {
        lock(&self.config).event_handler = Some(handler.into());
    }

    /// Instruments navigation, by default all guarded navigation is permitted.
    pub fn set_navigation_handler(&self, handler: Box<dyn NavEventHandler>) {
        lock(&self.config).navigation_handler = Some(handler.into());
    }

    /// Set the log filter level.
    ///
    /// By Default the log filter is set to [LogLevel::Info]
    pub fn set_log_level(&self, level: LogLevel) {
        lock(&self.config).log_level = level;
    }

    /// By default `http://127.0.0.1:8099`.
    pub fn set_base_url(&self, url: String) {
        lock(&self.config).base_url = url;
    }

    /// Set the per call timeout in milliseconds.
    ///
    /// By default the timeout is 5 seconds.
    pub fn set_timeout_ms(&self, timeout: u64) {
        lock(&self.config).timeout_ms = timeout;
    }

    pub fn log_level(&self) -> LogLevel {
        lock(&self.config).log_level
    }

    pub fn base_url(&self) -> String {
        lock(&self.config).base_url.clone()
    }

    pub fn timeout_ms(&self) -> u64 {
        lock(&self.config).timeout_ms
    }

    pub fn build(&self) -> Result<Arc<DormClient>, ClientError> {
        let config = lock(&self.config).clone();
        DormClient::new(config).map(Arc::new)
    }
}

impl DormClientBuilder {
    /// Replaces the console's default route table.
    pub fn set_routes(&self, routes: RouteTable) {
        lock(&self.config).routes = routes;
    }

    pub fn configuration(&self) -> ClientConfiguration {
        lock(&self.config).clone()
    }

    /// Builds a client that sends through `transport` instead of HTTP.
    pub fn build_with_transport(&self, transport: Arc<dyn Transport>) -> DormClient {
        DormClient::with_transport(self.configuration(), transport)
    }
}

/// Owns the navigator and the host handler. Host callbacks only ever run
/// after the navigator lock is released.
struct ClientEvents {
    navigator: Mutex<Navigator>,
    host: Option<Arc<dyn ConsoleEventHandler>>,
}

impl ClientEvents {
    fn with_navigator<R>(&self, f: impl FnOnce(&mut Navigator) -> R) -> R {
        let (out, events) = {
            let mut navigator = lock(&self.navigator);
            let out = f(&mut *navigator);
            (out, navigator.take_events())
        };

        if let Some(host) = &self.host {
            for event in events {
                event.deliver(host.as_ref());
            }
        }
        out
    }

    /// Moves to `route` unless the user is already there.
    fn land_on(&self, route: RouteName) {
        self.with_navigator(|navigator| {
            if navigator.current().map(|e| e.route) == Some(route) {
                return;
            }
            if let Err(e) = navigator.navigate_to(route) {
                warn!("Could not move to {route}: {e}");
            }
        })
    }
}

impl ConsoleEventHandler for ClientEvents {
    fn on_notice(&self, notice: Notice) {
        if let Some(host) = &self.host {
            host.on_notice(notice);
        }
    }

    fn on_redirect(&self, route: RouteName) {
        self.land_on(route);
        if let Some(host) = &self.host {
            host.on_redirect(route);
        }
    }
}

/// The console's single HTTP client and navigation state.
#[derive(uniffi::Object)]
pub struct DormClient {
    session: SessionContext,
    pipeline: Pipeline,
    transport: Arc<dyn Transport>,
    events: Arc<ClientEvents>,
    jar: Option<Arc<CredentialJar>>,
}

impl std::fmt::Debug for DormClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DormClient")
            .field("session", &self.session)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl DormClient {
    pub fn new(config: ClientConfiguration) -> Result<Self, ClientError> {
        init_log(config.log_level);
        debug!("Initializing DormClient.");
        debug!("Configuration: {config:?}");

        let jar = Arc::new(CredentialJar::new(config.persistence_provider.clone()));
        let transport = HttpTransport::new(
            &config.base_url,
            Duration::from_millis(config.timeout_ms),
            jar.clone(),
        )?;

        Ok(Self::assemble(config, Arc::new(transport), Some(jar)))
    }

    pub fn with_transport(config: ClientConfiguration, transport: Arc<dyn Transport>) -> Self {
        init_log(config.log_level);
        Self::assemble(config, transport, None)
    }

    fn assemble(
        config: ClientConfiguration,
        transport: Arc<dyn Transport>,
        jar: Option<Arc<CredentialJar>>,
    ) -> Self {
        let store = config
            .persistence_provider
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SecurePersistentStore>);
        let session = SessionContext::new(store);

        let mut navigator = Navigator::new(config.routes, session.clone());
        navigator.set_event_handler(config.navigation_handler);

        let events = Arc::new(ClientEvents {
            navigator: Mutex::new(navigator),
            host: config.event_handler,
        });
        let pipeline = Pipeline::standard(
            session.clone(),
            Some(events.clone() as Arc<dyn ConsoleEventHandler>),
        );

        Self {
            session,
            pipeline,
            transport,
            events,
            jar,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Sends `request` through the interceptor pipeline, resolving with the
    /// unwrapped payload.
    pub async fn send(&self, request: RequestEnvelope) -> Result<Value, ClientError> {
        self.pipeline.run(self.transport.as_ref(), request).await
    }

    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        request: RequestEnvelope,
    ) -> Result<T, ClientError> {
        let payload = self.send(request).await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub(crate) async fn call_unit(&self, request: RequestEnvelope) -> Result<(), ClientError> {
        self.send(request).await.map(|_| ())
    }

    pub(crate) fn land_on(&self, route: RouteName) {
        self.events.land_on(route)
    }
}

#[uniffi::export]
impl DormClient {
    /// Forgets the session and credential cookies and returns to login.
    pub fn logout(&self) {
        self.session.clear();
        if let Some(jar) = &self.jar {
            jar.clear();
        }
        self.land_on(RouteName::Login);
    }

    /// The logged in user, `None` when logged out or the record is unusable.
    pub fn current_user(&self) -> Option<User> {
        match self.session.load() {
            Ok(session) => session.map(|s| s.into_user()),
            Err(e) => {
                warn!("Ignoring unusable session: {e}");
                None
            }
        }
    }

    /// Guarded navigation to `path`, returns where the user actually landed.
    pub fn navigate(&self, path: String) -> Result<NavHistoryEntry, ClientError> {
        Ok(self.events.with_navigator(|n| n.navigate(&path))?)
    }

    pub fn navigate_to(&self, route: RouteName) -> Result<NavHistoryEntry, ClientError> {
        Ok(self.events.with_navigator(|n| n.navigate_to(route))?)
    }

    /// Navigates back one step in the history stack.
    /// This function fails if there are fewer than two entries.
    pub fn back(&self) -> Result<NavHistoryEntry, ClientError> {
        Ok(self.events.with_navigator(Navigator::back)?)
    }

    pub fn can_go_back(&self) -> bool {
        lock(&self.events.navigator).can_go_back()
    }

    pub fn current_route(&self) -> Option<NavHistoryEntry> {
        lock(&self.events.navigator).current()
    }

    pub fn history(&self) -> Vec<NavHistoryEntry> {
        lock(&self.events.navigator).entries()
    }

    pub fn set_log_level(&self, level: LogLevel) {
        inner::set_log_level(level)
    }
}

#[cfg(test)]
mod tests;
