use log::debug;

use super::RouteDescriptor;
use crate::{
    callbacks::{Notice, UNKNOWN_ROLE},
    model::RouteName,
    session::SessionState,
};

/// Outcome of guarding one navigation attempt. Notices travel with the
/// decision, the guard itself has no side effects.
#[derive(uniffi::Enum, Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    RedirectTo {
        route: RouteName,
        notice: Option<Notice>,
    },
    Deny {
        notice: Notice,
    },
}

/// Decides whether `destination` may render for the given session.
///
/// A malformed session counts as logged out, and never satisfies a role
/// requirement.
pub fn evaluate(destination: &RouteDescriptor, session: &SessionState) -> Decision {
    let active = session.active();

    if destination.is_login() {
        return match active {
            Some(_) => Decision::RedirectTo {
                route: RouteName::Main,
                notice: None,
            },
            None => Decision::Proceed,
        };
    }

    let Some(session) = active else {
        debug!("No usable session for {}", destination.path);
        return Decision::RedirectTo {
            route: RouteName::Login,
            notice: Some(Notice::session_missing()),
        };
    };

    let Some(required) = destination.required_role else {
        return Decision::Proceed;
    };

    match session.parsed_role() {
        Some(role) if role == required => Decision::Proceed,
        Some(role) => {
            debug!(
                "Role {role} may not enter {} (needs {required})",
                destination.path
            );
            Decision::RedirectTo {
                route: RouteName::Main,
                notice: Some(Notice::access_denied()),
            }
        }
        None => Decision::Deny {
            notice: Notice::error(UNKNOWN_ROLE),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{Role, User},
        router::RouteTable,
        session::{Session, SessionError},
    };

    fn active(role: &str) -> SessionState {
        SessionState::Active(
            Session::new(User {
                user_id: 1,
                role: role.into(),
                token: Some("tok".into()),
                ..Default::default()
            })
            .expect("session"),
        )
    }

    fn malformed() -> SessionState {
        SessionState::Malformed(SessionError::Malformed {
            reason: "eof".into(),
        })
    }

    fn route(name: RouteName) -> RouteDescriptor {
        RouteTable::console()
            .by_name(name)
            .cloned()
            .expect("route in table")
    }

    #[test]
    fn login_while_logged_in_goes_to_main() {
        assert_eq!(
            evaluate(&route(RouteName::Login), &active("STUDENT")),
            Decision::RedirectTo {
                route: RouteName::Main,
                notice: None
            }
        );
    }

    #[test]
    fn login_without_session_proceeds() {
        assert_eq!(
            evaluate(&route(RouteName::Login), &SessionState::Absent),
            Decision::Proceed
        );
        assert_eq!(
            evaluate(&route(RouteName::Login), &malformed()),
            Decision::Proceed
        );
    }

    #[test]
    fn every_other_route_needs_a_session() {
        for name in [
            RouteName::Main,
            RouteName::AllUsers,
            RouteName::Dormitory,
            RouteName::MessageBoard,
            RouteName::NotFound,
        ] {
            for state in [SessionState::Absent, malformed()] {
                assert_eq!(
                    evaluate(&route(name), &state),
                    Decision::RedirectTo {
                        route: RouteName::Login,
                        notice: Some(Notice::session_missing()),
                    },
                    "{name} with {state:?}"
                );
            }
        }
    }

    #[test]
    fn student_cannot_open_admin_views() {
        assert_eq!(
            evaluate(&route(RouteName::AllUsers), &active("STUDENT")),
            Decision::RedirectTo {
                route: RouteName::Main,
                notice: Some(Notice::access_denied()),
            }
        );
    }

    #[test]
    fn matching_role_proceeds() {
        assert_eq!(
            evaluate(&route(RouteName::Dormitory), &active("ADMIN")),
            Decision::Proceed
        );
        assert_eq!(
            evaluate(&route(RouteName::MessageBoard), &active("STUDENT")),
            Decision::Proceed
        );
    }

    #[test]
    fn unknown_role_is_denied() {
        let dest = route(RouteName::AllUsers);
        assert_eq!(dest.required_role, Some(Role::Admin));
        assert!(matches!(
            evaluate(&dest, &active("admin")),
            Decision::Deny { .. }
        ));
        // no requirement, no need to understand the role
        assert_eq!(
            evaluate(&route(RouteName::Main), &active("GUEST")),
            Decision::Proceed
        );
    }
}
