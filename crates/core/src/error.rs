use crate::{router::NavigationError, session::SessionError};

#[derive(Debug, Clone, PartialEq, thiserror::Error, uniffi::Error)]
pub enum ClientError {
    #[error("Transport Error - {message}")]
    Transport { message: String },

    /// The backend answered with the unauthenticated code, the session has
    /// already been torn down by the time this is returned.
    #[error("Unauthorized ({code}) - {message}")]
    Unauthorized {
        code: i64,
        message: String,
        payload: String,
    },

    #[error("Request Failed ({code}) - {message}")]
    Application {
        code: i64,
        message: String,
        payload: String,
    },

    #[error("Persisted session is corrupt - {reason}")]
    SessionCorrupt { reason: String },

    #[error("JSON Deserialization - {error}")]
    Decode { error: String },

    #[error("Invalid Request - {error}")]
    InvalidRequest { error: String },

    #[error("Navigation Error - {reason}")]
    Navigation { reason: String },
}

impl ClientError {
    /// The raw backend body for rejections that carry one.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { payload, .. } | Self::Application { payload, .. } => {
                Some(payload.as_str())
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<SessionError> for ClientError {
    fn from(value: SessionError) -> Self {
        Self::SessionCorrupt {
            reason: value.to_string(),
        }
    }
}

impl From<NavigationError> for ClientError {
    fn from(value: NavigationError) -> Self {
        Self::Navigation {
            reason: value.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport {
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode {
            error: value.to_string(),
        }
    }
}

impl From<serde_urlencoded::ser::Error> for ClientError {
    fn from(value: serde_urlencoded::ser::Error) -> Self {
        Self::InvalidRequest {
            error: value.to_string(),
        }
    }
}
