use serde_json::json;

use super::paged;
use crate::{
    client::{pipeline::RequestEnvelope, DormClient},
    error::ClientError,
    model::{Dorm, Pager},
};

/// Admin only.
pub fn dorms_by_page(page: u32, size: u32) -> Result<RequestEnvelope, ClientError> {
    Ok(RequestEnvelope::get(paged("/dorm", page, size)?))
}

pub fn add_dorm(name: &str) -> RequestEnvelope {
    RequestEnvelope::post("/dorm", json!({ "name": name }))
}

pub fn update_dorm(dorm_id: i64, name: &str) -> RequestEnvelope {
    RequestEnvelope::put("/dorm", json!({ "dormitoryId": dorm_id, "name": name }))
}

pub fn delete_dorm(dorm_id: i64) -> RequestEnvelope {
    RequestEnvelope::delete(format!("/dorm/{dorm_id}"))
}

/// Makes `user_id` an admin of the building.
pub fn assign_admin(dorm_id: i64, user_id: i64) -> RequestEnvelope {
    RequestEnvelope::put(
        "/dorm/admin",
        json!({ "dormitoryId": dorm_id, "userId": user_id }),
    )
}

#[uniffi::export(async_runtime = "tokio")]
impl DormClient {
    pub async fn add_dorm(&self, name: String) -> Result<(), ClientError> {
        self.call_unit(add_dorm(&name)).await
    }

    pub async fn update_dorm(&self, dorm_id: i64, name: String) -> Result<(), ClientError> {
        self.call_unit(update_dorm(dorm_id, &name)).await
    }

    pub async fn delete_dorm(&self, dorm_id: i64) -> Result<(), ClientError> {
        self.call_unit(delete_dorm(dorm_id)).await
    }

    pub async fn assign_dorm_admin(&self, dorm_id: i64, user_id: i64) -> Result<(), ClientError> {
        self.call_unit(assign_admin(dorm_id, user_id)).await
    }
}

impl DormClient {
    pub async fn dorms_by_page(&self, page: u32, size: u32) -> Result<Pager<Dorm>, ClientError> {
        self.call(dorms_by_page(page, size)?).await
    }
}
