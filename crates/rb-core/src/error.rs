//! Error types for rb-core

use thiserror::Error;

/// Main error type for rb-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown room code: {0}")]
    UnknownRoomCode(String),
}

/// Result type alias for rb-core
pub type Result<T> = std::result::Result<T, Error>;
