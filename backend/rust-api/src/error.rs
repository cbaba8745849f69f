//! Error types shared by the services and the HTTP layer.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::puzzle::Difficulty;

/// Errors raised while loading the static puzzle catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read puzzle catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse puzzle catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Puzzle catalog is empty")]
    Empty,
}

/// Errors from the key-value state store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to (de)serialize value for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from building or transmitting an email.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("No recipients configured")]
    NoRecipients,

    #[error("Failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// The diversity constraints could not be satisfied from the fresh puzzles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(
        "Not enough puzzles to satisfy constraints: {easy_available} fresh easy, \
         {pool_available} fresh {pool}"
    )]
    Exhausted {
        easy_available: usize,
        pool: Difficulty,
        pool_available: usize,
    },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("No puzzles stored for today. Run /send-question first.")]
    MissingTodayPuzzles,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mail(#[from] MailError),
}
