//! rb-booking: Booking backend client
//!
//! `/api/rooms` と `/api/bookings` を呼び出す薄い HTTP クライアントです。
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rb_booking::BookingClient;
//! use rb_core::{ApiConfig, BookingPayload, RoomCode};
//!
//! let client = BookingClient::new(&ApiConfig::default())?;
//! let rooms = client.fetch_rooms().await?;
//!
//! let payload = BookingPayload::new("2025-03-01", "2025-03-03", RoomCode::Double, 2)
//!     .with_guest("Taro", "090-0000-0000")
//!     .with_line_user(profile.user_id, profile.display_name);
//! let created = client.create_booking(&payload).await?;
//! ```

pub mod client;
pub mod error;

pub use client::BookingClient;
pub use error::{BookingError, Result};
