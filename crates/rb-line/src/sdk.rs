//! Identity SDK boundary

use async_trait::async_trait;

use crate::error::SdkError;
use crate::types::LineProfile;

/// Operations the booking flow needs from the LIFF-style identity SDK
#[async_trait]
pub trait IdentitySdk: Send + Sync {
    /// Initialize the SDK for a LIFF app. Called at most once per bootstrap.
    async fn init(&self, liff_id: &str) -> Result<(), SdkError>;

    /// Whether a user is authenticated
    fn is_logged_in(&self) -> bool;

    /// Start the login redirect. The caller abandons its remaining work.
    fn login(&self);

    /// Profile of the authenticated user
    async fn get_profile(&self) -> Result<LineProfile, SdkError>;

    /// Whether we run inside the LINE in-app browser
    fn is_in_client(&self) -> Result<bool, SdkError>;
}
