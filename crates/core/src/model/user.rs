use serde::{Deserialize, Serialize};

use super::{de_nullable, Role};

/// A console account, either a dormitory admin or a student.
///
/// `role` is kept as the raw wire string so that an unexpected value coming
/// back from the backend still round-trips; use [User::parsed_role] for access
/// decisions.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "de_nullable")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub name: String,
    /// Staff or student number, used as the login id.
    #[serde(default, deserialize_with = "de_nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "de_nullable")]
    pub role: String,
    #[serde(default, deserialize_with = "de_nullable")]
    pub phone: String,
    #[serde(default, deserialize_with = "de_nullable")]
    pub gender: String,
    #[serde(default)]
    pub birth: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl User {
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.parsed_role() == Some(Role::Admin)
    }
}
