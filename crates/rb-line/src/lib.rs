//! rb-line: LINE identity for room-booking
//!
//! LIFF SDK の初期化をページロードごとに一度だけ行い、ログインの要否を判定して
//! ユーザープロフィール（ID・表示名）を取得します。
//!
//! - [`IdentitySdk`]: 外部 SDK との境界
//! - [`IdentityBootstrap`]: 初期化の一元管理とログイン誘導
//! - [`LineSdk`]: LINE Platform の HTTP API を使う `IdentitySdk` 実装

pub mod api;
pub mod bootstrap;
pub mod error;
pub mod sdk;
pub mod types;

pub use api::LineSdk;
pub use bootstrap::{IdentityBootstrap, InitOutcome, InitState, LoginPolicy};
pub use error::{LineError, Result, SdkError};
pub use sdk::IdentitySdk;
pub use types::LineProfile;
