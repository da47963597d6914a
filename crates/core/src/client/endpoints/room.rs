use serde_json::json;

use super::paged;
use crate::{
    client::{pipeline::RequestEnvelope, DormClient},
    error::ClientError,
    model::{Pager, Room, StudentRoomInfo},
};

pub fn rooms_by_page(dorm_id: i64, page: u32, size: u32) -> Result<RequestEnvelope, ClientError> {
    Ok(RequestEnvelope::get(paged(
        &format!("/room/{dorm_id}"),
        page,
        size,
    )?))
}

pub fn add_room(dorm_id: i64, name: &str, total_beds: i64) -> Result<RequestEnvelope, ClientError> {
    check_beds(total_beds)?;
    Ok(RequestEnvelope::post(
        "/room",
        json!({ "dormitoryId": dorm_id, "name": name, "totalBeds": total_beds }),
    ))
}

pub fn update_room(room_id: i64, name: &str, total_beds: i64) -> Result<RequestEnvelope, ClientError> {
    check_beds(total_beds)?;
    Ok(RequestEnvelope::put(
        "/room",
        json!({ "roomId": room_id, "name": name, "totalBeds": total_beds }),
    ))
}

pub fn delete_room(room_id: i64) -> RequestEnvelope {
    RequestEnvelope::delete(format!("/room/{room_id}"))
}

/// Gives `user_id` a bed in `room_id`.
pub fn assign_occupant(room_id: i64, user_id: i64) -> RequestEnvelope {
    RequestEnvelope::put("/room/user", json!({ "roomId": room_id, "userId": user_id }))
}

pub fn student_room_info(user_id: i64) -> RequestEnvelope {
    RequestEnvelope::get(format!("/room/student/{user_id}"))
}

fn check_beds(total_beds: i64) -> Result<(), ClientError> {
    if total_beds < 1 {
        return Err(ClientError::InvalidRequest {
            error: format!("a room needs at least one bed, got {total_beds}"),
        });
    }
    Ok(())
}

#[uniffi::export(async_runtime = "tokio")]
impl DormClient {
    pub async fn add_room(
        &self,
        dorm_id: i64,
        name: String,
        total_beds: i64,
    ) -> Result<(), ClientError> {
        self.call_unit(add_room(dorm_id, &name, total_beds)?).await
    }

    pub async fn update_room(
        &self,
        room_id: i64,
        name: String,
        total_beds: i64,
    ) -> Result<(), ClientError> {
        self.call_unit(update_room(room_id, &name, total_beds)?)
            .await
    }

    pub async fn delete_room(&self, room_id: i64) -> Result<(), ClientError> {
        self.call_unit(delete_room(room_id)).await
    }

    pub async fn assign_occupant(&self, room_id: i64, user_id: i64) -> Result<(), ClientError> {
        self.call_unit(assign_occupant(room_id, user_id)).await
    }

    /// `None` when the student has no bed yet.
    pub async fn student_room_info(
        &self,
        user_id: i64,
    ) -> Result<Option<StudentRoomInfo>, ClientError> {
        self.call(student_room_info(user_id)).await
    }
}

impl DormClient {
    pub async fn rooms_by_page(
        &self,
        dorm_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Pager<Room>, ClientError> {
        self.call(rooms_by_page(dorm_id, page, size)?).await
    }
}
