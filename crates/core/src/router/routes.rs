use crate::model::{Role, RouteName};

const CATCH_ALL: &str = "*";

/// A named view and who may open it.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: RouteName,
    /// When set, only sessions holding exactly this role may enter.
    pub required_role: Option<Role>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, name: RouteName) -> Self {
        Self {
            path: path.into(),
            name,
            required_role: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    pub fn is_login(&self) -> bool {
        self.name == RouteName::Login
    }
}

/// Static table of routes, read only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::console()
    }
}

impl RouteTable {
    /// Builds a table from `routes`. A [RouteName::NotFound] catch-all is
    /// appended when the caller didn't supply one.
    pub fn new(mut routes: Vec<RouteDescriptor>) -> Self {
        if !routes.iter().any(|r| r.name == RouteName::NotFound) {
            routes.push(RouteDescriptor::new(CATCH_ALL, RouteName::NotFound));
        }
        Self { routes }
    }

    /// The admin console's views.
    pub fn console() -> Self {
        Self::new(vec![
            RouteDescriptor::new("/", RouteName::Login),
            RouteDescriptor::new("/main", RouteName::Main),
            RouteDescriptor::new("/main/users", RouteName::AllUsers).with_role(Role::Admin),
            RouteDescriptor::new("/main/dorm", RouteName::Dormitory).with_role(Role::Admin),
            RouteDescriptor::new("/main/msg", RouteName::MessageBoard),
            RouteDescriptor::new(CATCH_ALL, RouteName::NotFound),
        ])
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Matches `path` ignoring query, fragment and a trailing slash. Anything
    /// unmatched lands on the catch-all.
    pub fn resolve(&self, path: &str) -> &RouteDescriptor {
        let path = normalize(path);
        self.routes
            .iter()
            .find(|r| r.name != RouteName::NotFound && normalize(&r.path) == path)
            .unwrap_or_else(|| self.not_found())
    }

    pub fn by_name(&self, name: RouteName) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name == name)
    }

    fn not_found(&self) -> &RouteDescriptor {
        // `new` guarantees the entry, the index fallback only guards against
        // a hand edited table
        self.by_name(RouteName::NotFound)
            .unwrap_or(&self.routes[self.routes.len() - 1])
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
