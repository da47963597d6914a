use serde::{Deserialize, Serialize};

use super::{de_count, de_nullable, User};

/// A room inside a dormitory building.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default, deserialize_with = "de_nullable")]
    pub room_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub dormitory_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub name: String,
    /// Beds currently taken.
    #[serde(default, deserialize_with = "de_count")]
    pub head_count: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub total_beds: i64,
    #[serde(default)]
    pub users: Option<Vec<User>>,
}

impl Room {
    pub fn free_beds(&self) -> i64 {
        (self.total_beds - self.head_count).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.free_beds() == 0
    }
}
