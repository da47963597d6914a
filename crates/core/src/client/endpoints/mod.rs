//! One request builder per backend operation, plus the typed [DormClient]
//! methods that send them.
//!
//! [DormClient]: crate::client::DormClient
pub mod dorm;
pub mod msg;
pub mod room;
pub mod user;

use crate::error::ClientError;

/// `{prefix}/{page}/{size}`, pages count from 1.
pub(crate) fn paged(prefix: &str, page: u32, size: u32) -> Result<String, ClientError> {
    if page == 0 || size == 0 {
        return Err(ClientError::InvalidRequest {
            error: format!("page ({page}) and size ({size}) must be at least 1"),
        });
    }
    Ok(format!("{prefix}/{page}/{size}"))
}
