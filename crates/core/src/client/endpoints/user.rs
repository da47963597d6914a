use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use serde_json::json;

use super::paged;
use crate::{
    client::{pipeline::RequestEnvelope, DormClient},
    error::ClientError,
    model::{Gender, Pager, RouteName, User},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a date the way the backend expects birthdays, e.g. `2004-02-21`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Registration form for a new account.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    /// Staff or student number.
    pub id: String,
    pub password: String,
    pub phone: String,
    pub gender: Gender,
    /// `YYYY-MM-DD`, see [format_date].
    pub birth: String,
}

impl NewUser {
    fn validate(&self) -> Result<(), ClientError> {
        NaiveDate::parse_from_str(&self.birth, DATE_FORMAT).map_err(|e| {
            ClientError::InvalidRequest {
                error: format!("birth `{}`: {e}", self.birth),
            }
        })?;
        if self.id.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::InvalidRequest {
                error: "id and password are required".into(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    keyword: &'a str,
    page: u32,
    size: u32,
}

pub fn login(id: &str, password: &str) -> RequestEnvelope {
    RequestEnvelope::post("/user/login", json!({ "id": id, "password": password }))
}

/// Admin self registration, students are added by an admin.
pub fn register(user: &NewUser) -> Result<RequestEnvelope, ClientError> {
    user.validate()?;
    Ok(RequestEnvelope::post("/user", serde_json::to_value(user)?))
}

pub fn add_student(user: &NewUser) -> Result<RequestEnvelope, ClientError> {
    user.validate()?;
    Ok(RequestEnvelope::post("/user/student", serde_json::to_value(user)?))
}

pub fn all_users() -> RequestEnvelope {
    RequestEnvelope::get("/user")
}

pub fn users_by_page(page: u32, size: u32) -> Result<RequestEnvelope, ClientError> {
    Ok(RequestEnvelope::get(paged("/user", page, size)?))
}

pub fn search_users(keyword: &str, page: u32, size: u32) -> Result<RequestEnvelope, ClientError> {
    paged("", page, size)?;
    RequestEnvelope::get("/user/search").with_query(&SearchQuery {
        keyword,
        page,
        size,
    })
}

pub fn update_user(user: &User) -> Result<RequestEnvelope, ClientError> {
    let mut body = serde_json::to_value(user)?;
    // never echo a token back
    if let Some(map) = body.as_object_mut() {
        map.remove("token");
    }
    Ok(RequestEnvelope::put("/user", body))
}

pub fn delete_user(user_id: i64) -> RequestEnvelope {
    RequestEnvelope::delete(format!("/user/{user_id}"))
}

#[uniffi::export(async_runtime = "tokio")]
impl DormClient {
    /// Logs in and persists the returned user as the session.
    pub async fn login(&self, id: String, password: String) -> Result<User, ClientError> {
        let user: User = self.call(login(&id, &password)).await?;
        let session = self.session().establish(user)?;
        info!("Logged in as {}", session.user().id);
        self.land_on(RouteName::Main);
        Ok(session.into_user())
    }

    pub async fn register(&self, user: NewUser) -> Result<(), ClientError> {
        self.call_unit(register(&user)?).await
    }

    pub async fn add_student(&self, user: NewUser) -> Result<(), ClientError> {
        self.call_unit(add_student(&user)?).await
    }

    /// Admin only.
    pub async fn all_users(&self) -> Result<Vec<User>, ClientError> {
        self.call(all_users()).await
    }

    pub async fn update_user(&self, user: User) -> Result<(), ClientError> {
        self.call_unit(update_user(&user)?).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ClientError> {
        self.call_unit(delete_user(user_id)).await
    }
}

impl DormClient {
    pub async fn users_by_page(&self, page: u32, size: u32) -> Result<Pager<User>, ClientError> {
        self.call(users_by_page(page, size)?).await
    }

    pub async fn search_users(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> Result<Pager<User>, ClientError> {
        self.call(search_users(keyword, page, size)?).await
    }
}
