//! Client side core of the dormitory management console: the persisted
//! login session, the HTTP interceptor pipeline, the route guard and one
//! typed call per backend endpoint.
pub mod callbacks;
pub mod client;
pub mod error;
pub mod model;
pub mod persistence;
pub mod router;
pub mod session;

pub use self::{
    client::{DormClient, DormClientBuilder},
    error::ClientError,
    session::{Session, SessionContext, SessionState},
};

uniffi::setup_scaffolding!();
