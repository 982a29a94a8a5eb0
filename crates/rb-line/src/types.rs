//! LINE Platform types

use serde::{Deserialize, Serialize};

/// LINE user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProfile {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Response of `GET /oauth2/v2.1/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenVerification {
    pub client_id: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}
