//! The module contains the errors the engine can raise.
//!
//! Services classify failures and return them to the caller; presenting
//! them (toast, banner, HTTP status) is the caller's concern. The engine
//! never renders anything itself.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No resolvable scope: profile missing, or a group account without a
    /// group id.
    #[error("no resolvable scope: {0}")]
    Unscoped(String),
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("category limit of {0} reached")]
    CategoryLimitExceeded(usize),
    #[error("category in use: {0}")]
    CategoryInUse(String),
    #[error("invalid invite code: {0}")]
    InvalidInviteCode(String),
    #[error("member already exists: {0}")]
    MemberAlreadyExists(String),
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unscoped(a), Self::Unscoped(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::DuplicateCategory(a), Self::DuplicateCategory(b)) => a == b,
            (Self::CategoryLimitExceeded(a), Self::CategoryLimitExceeded(b)) => a == b,
            (Self::CategoryInUse(a), Self::CategoryInUse(b)) => a == b,
            (Self::InvalidInviteCode(a), Self::InvalidInviteCode(b)) => a == b,
            (Self::MemberAlreadyExists(a), Self::MemberAlreadyExists(b)) => a == b,
            (Self::InvalidDateRange(a), Self::InvalidDateRange(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
