use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;
use crate::models::EntityKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{name} already registered in {kind}")]
    Duplicate { kind: EntityKind, name: String },

    #[error("{name} not found in storage `{kind}`")]
    NotFound { kind: EntityKind, name: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed storage document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Duplicate { .. })
    }

    /// HTTP status of a rejected remote call, if this error is one.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Error::Api(ApiError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_collection() {
        let err = Error::NotFound {
            kind: EntityKind::Flags,
            name: "intro".to_string(),
        };
        assert_eq!(err.to_string(), "intro not found in storage `flags`");
        assert!(err.is_not_found());
        assert!(!err.is_duplicate());
    }

    #[test]
    fn test_remote_status() {
        let err: Error = ApiError::Status {
            method: "POST".to_string(),
            url: "http://localhost:8000/api/v1/users".to_string(),
            status: 403,
            body: "forbidden".to_string(),
        }
        .into();
        assert_eq!(err.remote_status(), Some(403));
        assert_eq!(Error::Config("x".to_string()).remote_status(), None);
    }
}
