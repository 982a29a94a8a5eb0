//! rb-core: Room Booking Core Library
//!
//! 設定の読み込み、予約 API と LINE 連携で共有するドメイン型を提供します。

pub mod config;
pub mod error;
pub mod types;

pub use config::{ApiConfig, Config, LineConfig, DEFAULT_API_BASE};
pub use error::{Error, Result};
pub use types::{BookingCreated, BookingPayload, Room, RoomCode};
