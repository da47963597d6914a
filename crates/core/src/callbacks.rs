use crate::model::RouteName;

pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const SESSION_MISSING: &str = "Not logged in or session expired, please log in";
pub const ACCESS_DENIED: &str = "Access denied for this path";
pub const UNKNOWN_ROLE: &str = "Your account role is not recognized";

/// Unique id in the history stack
pub type HistoryId = u64;

#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the host should show to the user, e.g. as a toast.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn session_expired() -> Self {
        Self::warning(SESSION_EXPIRED)
    }

    pub fn session_missing() -> Self {
        Self::warning(SESSION_MISSING)
    }

    pub fn access_denied() -> Self {
        Self::error(ACCESS_DENIED)
    }
}

/// Side effects requested by the core that only the host UI can carry out.
#[uniffi::export(callback_interface)]
pub trait ConsoleEventHandler: Send + Sync {
    /// Show `notice` to the user.
    fn on_notice(&self, notice: Notice);

    /// Move the UI to `route`. Fired when the session expires mid request and
    /// when a navigation ends somewhere other than where it was aimed.
    fn on_redirect(&self, route: RouteName);
}

/// Host side effect queued while navigating, delivered once the navigator
/// has been released so handlers may call back into the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Notice(Notice),
    Redirect(RouteName),
}

impl ConsoleEvent {
    pub fn deliver(self, handler: &dyn ConsoleEventHandler) {
        match self {
            ConsoleEvent::Notice(notice) => handler.on_notice(notice),
            ConsoleEvent::Redirect(route) => handler.on_redirect(route),
        }
    }
}

#[uniffi::export(callback_interface)]
pub trait NavEventHandler: Send + Sync {
    /// Called for every navigation the guard lets through, before history
    /// changes. Return [HandlerResponse::PreventDefault] to cancel it.
    ///
    /// Runs while the navigation is in progress; it must not navigate or
    /// query history on the same client.
    fn handle_event(&self, event: NavEvent) -> HandlerResponse;
}

/// User emitted response from [NavEventHandler::handle_event].
/// Determines whether or not the default navigation action is taken.
#[derive(uniffi::Enum, Clone, Debug, PartialEq, Default)]
pub enum HandlerResponse {
    #[default]
    /// Return this to proceed as normal.
    Default,
    /// Return this to cancel the navigation before it occurs.
    PreventDefault,
}

#[derive(uniffi::Enum, Clone, Debug, PartialEq)]
pub enum NavEventType {
    /// Pushing a new entry onto the history stack
    Push,
    /// Popping back to the previous entry
    Back,
    /// Landing somewhere else because the guard redirected
    Redirect,
}

#[derive(uniffi::Record, Clone, Debug, PartialEq)]
pub struct NavHistoryEntry {
    /// The matched route.
    pub route: RouteName,
    /// The path as requested.
    pub path: String,
    /// Unique id for this entry.
    pub id: HistoryId,
}

impl NavHistoryEntry {
    pub fn new(route: RouteName, path: String, id: HistoryId) -> Self {
        Self { route, path, id }
    }
}

/// An event emitted when the user navigates between views.
#[derive(uniffi::Record, Clone, Debug, PartialEq)]
pub struct NavEvent {
    /// The type of event being emitted.
    pub event: NavEventType,
    /// The previous location, if there was one.
    pub from: Option<NavHistoryEntry>,
    /// Destination.
    pub to: NavHistoryEntry,
}

impl NavEvent {
    pub fn new(event: NavEventType, to: NavHistoryEntry, from: Option<NavHistoryEntry>) -> Self {
        Self { event, from, to }
    }
}
