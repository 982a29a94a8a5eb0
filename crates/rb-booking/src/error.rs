//! エラー型定義 (rb-booking)

use thiserror::Error;

/// Fallback message when the backend gives no usable `error` field
pub const CREATE_BOOKING_FALLBACK: &str = "Failed to create booking";

/// rb-booking のエラー型
#[derive(Error, Debug)]
pub enum BookingError {
    /// Rooms endpoint answered with a non-success status
    #[error("Failed to fetch rooms")]
    FetchRooms,

    /// Bookings endpoint answered with a non-success status.
    /// Carries the backend's `error` message verbatim when it sent one.
    #[error("{0}")]
    CreateBooking(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, BookingError>;
