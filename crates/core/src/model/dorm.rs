use serde::{Deserialize, Serialize};

use super::{de_count, de_nullable, User};

/// A dormitory building.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dorm {
    #[serde(default, deserialize_with = "de_nullable")]
    pub dormitory_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "de_count")]
    pub head_count: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub admins: Vec<User>,
}
