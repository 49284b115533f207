use std::fmt::Display;

use crate::identity::IdentityError;
use crate::op_log::OpLogError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("forbidden")]
    Forbidden,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Backend failure; the message is for logs, not for clients
    #[error("storage error: {0}")]
    Storage(String),
}

impl<T: Display> From<OpLogError<T>> for SyncError {
    fn from(e: OpLogError<T>) -> Self {
        SyncError::Storage(e.to_string())
    }
}

impl<T: Display> From<IdentityError<T>> for SyncError {
    fn from(e: IdentityError<T>) -> Self {
        SyncError::Storage(e.to_string())
    }
}
