//! Wire shapes exchanged with the dormitory backend.
//!
//! Field names follow the backend's camelCase JSON; everything crossing the
//! FFI boundary is a plain record.
mod dorm;
mod message_board;
mod pager;
mod room;
mod student_room_info;
mod user;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

pub use self::{
    dorm::Dorm, message_board::MessageBoard, pager::Pager, room::Room,
    student_room_info::StudentRoomInfo, user::User,
};

const ADMIN: &str = "ADMIN";
const STUDENT: &str = "STUDENT";

#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "STUDENT")]
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN,
            Role::Student => STUDENT,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ADMIN => Ok(Role::Admin),
            STUDENT => Ok(Role::Student),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Keys used in the [SecurePersistentStore](crate::persistence::SecurePersistentStore).
#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    /// The logged in [User], serialized as JSON.
    User,
    /// The credential cookie jar.
    Cookies,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::User => "user",
            StoreKey::Cookies => "cookies",
        }
    }
}

impl From<StoreKey> for String {
    fn from(key: StoreKey) -> Self {
        key.as_str().to_owned()
    }
}

/// Named views of the console.
#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Login,
    Main,
    AllUsers,
    Dormitory,
    MessageBoard,
    NotFound,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Login => "login",
            RouteName::Main => "main",
            RouteName::AllUsers => "all-users",
            RouteName::Dormitory => "dormitory",
            RouteName::MessageBoard => "message-board",
            RouteName::NotFound => "not-found",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Some counters come back as strings from older endpoints.
pub(crate) fn de_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Int(i64),
        Text(String),
        Null(()),
    }

    match Count::deserialize(deserializer)? {
        Count::Int(n) => Ok(n),
        Count::Text(s) if s.trim().is_empty() => Ok(0),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Count::Null(()) => Ok(0),
    }
}

/// Java backends send `null` for unset columns, read it as the default.
pub(crate) fn de_nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
