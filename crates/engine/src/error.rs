//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`ExistingKey`] thrown when an account id is already registered.
//! - [`KeyNotFound`] thrown when an account or a catalog item is not found.
//! - [`Unauthorized`] thrown when a credential does not match.
//! - [`InvalidFeed`] thrown when a catalog feed is malformed.
//! - [`InvalidAmount`] thrown when a quantity, cost or divisor is rejected.
//! - [`InvalidData`] thrown when a stored row cannot be decoded.
//!
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`InvalidFeed`]: EngineError::InvalidFeed
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidData`]: EngineError::InvalidData
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid feed: {0}")]
    InvalidFeed(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::InvalidFeed(a), Self::InvalidFeed(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
