use std::sync::Arc;

use log::{debug, warn};

use super::{evaluate, Decision, RouteDescriptor, RouteTable};
use crate::{
    callbacks::*,
    model::RouteName,
    session::SessionContext,
};

/// Redirects followed before a navigation is abandoned.
const MAX_REDIRECTS: usize = 10;

struct HandlerInternal<T: ?Sized>(pub Option<Arc<T>>);

impl<T: ?Sized> std::fmt::Debug for HandlerInternal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_some() {
            write!(f, "Handler Active")?;
        } else {
            write!(f, "No Handler Present")?;
        };
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    #[error("Navigation was prevented by a user handler")]
    PreventedByHandler,
    #[error("Navigation to {path} was denied: {}", .notice.message)]
    Denied { path: String, notice: Notice },
    #[error("Gave up on {path} after too many redirects")]
    RedirectLoop { path: String },
    #[error("No route named {name} in the route table")]
    UnknownRoute { name: RouteName },
    #[error("Cannot navigate back: history is empty or has only one entry")]
    CannotGoBack,
}

/// Guarded history of visited views.
///
/// Every transition, including redirects and `back`, is run through
/// [evaluate] against the session as it is in the store at that moment.
/// Notices and redirects pile up until collected with [Navigator::take_events].
#[derive(Debug)]
pub struct Navigator {
    routes: RouteTable,
    session: SessionContext,
    /// Previously visited views, current last
    history: Vec<NavHistoryEntry>,
    /// monotonically increasing ID for `NavHistoryEntry`
    id_source: HistoryId,
    /// Host events not yet collected
    pending: Vec<ConsoleEvent>,
    navigation_event_handler: HandlerInternal<dyn NavEventHandler>,
}

impl Navigator {
    pub fn new(routes: RouteTable, session: SessionContext) -> Self {
        Self {
            routes,
            session,
            history: Vec::new(),
            id_source: 0,
            pending: Vec::new(),
            navigation_event_handler: HandlerInternal(None),
        }
    }

    pub fn set_event_handler(&mut self, handler: Option<Arc<dyn NavEventHandler>>) {
        self.navigation_event_handler.0 = handler;
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Navigate to `path`, following guard redirects. Returns the entry that
    /// ended up on top of the history stack.
    pub fn navigate(&mut self, path: &str) -> Result<NavHistoryEntry, NavigationError> {
        let target = self.routes.resolve(path).clone();
        self.settle(target, path.to_owned(), NavEventType::Push)
    }

    /// Navigate to the route called `name`.
    pub fn navigate_to(&mut self, name: RouteName) -> Result<NavHistoryEntry, NavigationError> {
        let target = self
            .routes
            .by_name(name)
            .cloned()
            .ok_or(NavigationError::UnknownRoute { name })?;
        let path = target.path.clone();
        self.settle(target, path, NavEventType::Push)
    }

    /// Returns to the previous entry. The previous view is guarded again, if
    /// the session changed since it was visited the usual redirect applies
    /// and is pushed as a new entry.
    pub fn back(&mut self) -> Result<NavHistoryEntry, NavigationError> {
        if !self.can_go_back() {
            warn!("Attempted `back` navigation without at minimum two entries.");
            return Err(NavigationError::CannotGoBack);
        }

        let previous = self.history[self.history.len() - 2].clone();
        let target = self.routes.resolve(&previous.path).clone();

        if evaluate(&target, &self.session.state()) != Decision::Proceed {
            return self.settle(target, previous.path, NavEventType::Push);
        }

        let event = NavEvent::new(NavEventType::Back, previous.clone(), self.current());
        match self.handle_event(event) {
            HandlerResponse::Default => {
                self.history.pop();
                Ok(previous)
            }
            HandlerResponse::PreventDefault => Err(NavigationError::PreventedByHandler),
        }
    }

    // Returns true if the navigator can go back one entry.
    pub fn can_go_back(&self) -> bool {
        self.history.len() >= 2
    }

    /// Returns the current history entry
    pub fn current(&self) -> Option<NavHistoryEntry> {
        self.history.last().cloned()
    }

    pub fn entries(&self) -> Vec<NavHistoryEntry> {
        self.history.clone()
    }

    /// Drains the notices and redirects produced since the last call.
    pub fn take_events(&mut self) -> Vec<ConsoleEvent> {
        std::mem::take(&mut self.pending)
    }

    fn settle(
        &mut self,
        mut target: RouteDescriptor,
        mut path: String,
        mut kind: NavEventType,
    ) -> Result<NavHistoryEntry, NavigationError> {
        let requested = path.clone();
        let aimed_at = target.name;

        for _ in 0..MAX_REDIRECTS {
            match evaluate(&target, &self.session.state()) {
                Decision::Proceed => {
                    let entry = NavHistoryEntry::new(target.name, path, self.id_source + 1);
                    let event = NavEvent::new(kind, entry.clone(), self.current());

                    match self.handle_event(event) {
                        HandlerResponse::Default => {}
                        HandlerResponse::PreventDefault => {
                            return Err(NavigationError::PreventedByHandler)
                        }
                    };

                    self.push_entry(entry.clone());
                    if entry.route != aimed_at {
                        self.pending.push(ConsoleEvent::Redirect(entry.route));
                    }
                    return Ok(entry);
                }
                Decision::RedirectTo { route, notice } => {
                    debug!("Guard redirected {path} to {route}");
                    if let Some(notice) = notice {
                        self.notify(notice);
                    }
                    target = self
                        .routes
                        .by_name(route)
                        .cloned()
                        .ok_or(NavigationError::UnknownRoute { name: route })?;
                    path = target.path.clone();
                    kind = NavEventType::Redirect;
                }
                Decision::Deny { notice } => {
                    debug!("Guard denied {path}");
                    self.notify(notice.clone());
                    return Err(NavigationError::Denied { path, notice });
                }
            }
        }

        warn!("Redirect loop while navigating to {requested}");
        Err(NavigationError::RedirectLoop { path: requested })
    }

    fn push_entry(&mut self, history_entry: NavHistoryEntry) {
        self.id_source += 1;
        self.history.push(history_entry);
    }

    fn notify(&mut self, notice: Notice) {
        self.pending.push(ConsoleEvent::Notice(notice));
    }

    fn handle_event(&self, event: NavEvent) -> HandlerResponse {
        if let Some(handler) = self.navigation_event_handler.0.as_ref() {
            handler.handle_event(event)
        } else {
            HandlerResponse::Default
        }
    }
}
