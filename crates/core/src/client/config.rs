use std::sync::Arc;

use crate::{
    callbacks::{ConsoleEventHandler, NavEventHandler},
    persistence::SecurePersistentStore,
    router::RouteTable,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8099";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(uniffi::Enum, Debug, Clone, Default, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Clone)]
pub struct ClientConfiguration {
    /// Backend address every endpoint path is joined onto.
    pub base_url: String,
    /// Per call timeout in milliseconds.
    pub timeout_ms: u64,
    /// Initial log level - defaults to [LogLevel::Info]
    pub log_level: LogLevel,
    /// Where the session and cookies are kept. Without one the client keeps
    /// them in memory and forgets them on exit.
    pub persistence_provider: Option<Arc<dyn SecurePersistentStore>>,
    /// Receives notices and redirect requests.
    pub event_handler: Option<Arc<dyn ConsoleEventHandler>>,
    /// Observes, and may cancel, navigations the guard allowed.
    pub navigation_handler: Option<Arc<dyn NavEventHandler>>,
    pub routes: RouteTable,
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            log_level: LogLevel::default(),
            persistence_provider: None,
            event_handler: None,
            navigation_handler: None,
            routes: RouteTable::console(),
        }
    }
}

impl std::fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("log_level", &self.log_level)
            .field(
                "persistence_provider",
                &self.persistence_provider.is_some().then_some("..."),
            )
            .field(
                "event_handler",
                &self.event_handler.is_some().then_some("..."),
            )
            .field(
                "navigation_handler",
                &self.navigation_handler.is_some().then_some("..."),
            )
            .field("routes", &self.routes.routes().len())
            .finish()
    }
}
