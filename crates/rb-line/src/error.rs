//! エラー型定義 (rb-line)

use thiserror::Error;

/// Fault raised by an identity SDK.
///
/// `Clone` so one initialization outcome can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("SDK is not initialized")]
    NotInitialized,

    #[error("User is not logged in")]
    NotLoggedIn,

    #[error("Invalid LIFF ID: {0}")]
    InvalidLiffId(String),

    #[error("LINE API error: {0}")]
    ApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        Self::HttpError(e.to_string())
    }
}

/// rb-line のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Sdk(#[from] SdkError),
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, LineError>;
