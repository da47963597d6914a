use serde_json::json;

use super::paged;
use crate::{
    client::{pipeline::RequestEnvelope, DormClient},
    error::ClientError,
    model::{MessageBoard, Pager},
};

/// `top` is honoured for admins only.
pub fn add_message(dorm_id: i64, content: &str, top: bool) -> Result<RequestEnvelope, ClientError> {
    if content.trim().is_empty() {
        return Err(ClientError::InvalidRequest {
            error: "message content is empty".into(),
        });
    }
    Ok(RequestEnvelope::post(
        "/msg",
        json!({ "dormitoryId": dorm_id, "content": content, "top": top }),
    ))
}

/// Admins may delete any message, students only their own.
pub fn delete_message(msg_id: i64) -> RequestEnvelope {
    RequestEnvelope::delete(format!("/msg/{msg_id}"))
}

pub fn messages_by_page(dorm_id: i64, page: u32, size: u32) -> Result<RequestEnvelope, ClientError> {
    Ok(RequestEnvelope::get(paged(
        &format!("/msg/{dorm_id}"),
        page,
        size,
    )?))
}

/// The pinned message of the building `user_id` manages or lives in.
pub fn top_message(user_id: i64) -> RequestEnvelope {
    RequestEnvelope::get(format!("/msg/top/{user_id}"))
}

#[uniffi::export(async_runtime = "tokio")]
impl DormClient {
    pub async fn add_message(
        &self,
        dorm_id: i64,
        content: String,
        top: bool,
    ) -> Result<(), ClientError> {
        self.call_unit(add_message(dorm_id, &content, top)?).await
    }

    pub async fn delete_message(&self, msg_id: i64) -> Result<(), ClientError> {
        self.call_unit(delete_message(msg_id)).await
    }

    pub async fn top_message(&self, user_id: i64) -> Result<Option<MessageBoard>, ClientError> {
        self.call(top_message(user_id)).await
    }
}

impl DormClient {
    pub async fn messages_by_page(
        &self,
        dorm_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Pager<MessageBoard>, ClientError> {
        self.call(messages_by_page(dorm_id, page, size)?).await
    }
}
