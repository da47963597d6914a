use serde::{Deserialize, Serialize};

use super::{de_nullable, User};

/// Where a student lives, with the people they share it with.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRoomInfo {
    #[serde(default, deserialize_with = "de_nullable")]
    pub dorm_name: String,
    #[serde(default, deserialize_with = "de_nullable")]
    pub dorm_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub room_name: String,
    #[serde(default, deserialize_with = "de_nullable")]
    pub total_beds: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub admins: Vec<User>,
    #[serde(default, deserialize_with = "de_nullable")]
    pub room_mates: Vec<User>,
}
