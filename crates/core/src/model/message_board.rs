use serde::{Deserialize, Serialize};

use super::{de_nullable, User};

/// A message posted to a dormitory's board.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBoard {
    #[serde(default, deserialize_with = "de_nullable")]
    pub message_board_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub dormitory_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "de_nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "de_nullable")]
    pub create_date: String,
    /// Pinned to the top of the board, only admins may set it.
    #[serde(default, deserialize_with = "de_nullable")]
    pub top: bool,
    /// The author.
    #[serde(default)]
    pub user: Option<User>,
}
