//! LINE Platform identity SDK
//!
//! Native counterpart of the LIFF SDK: verifies a LINE Login access token,
//! builds the LINE Login redirect and reads the user profile.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error, info, warn};

use rb_core::LineConfig;

use crate::error::SdkError;
use crate::sdk::IdentitySdk;
use crate::types::{LineProfile, TokenVerification};

const LINE_API_BASE: &str = "https://api.line.me";
const LINE_LOGIN_BASE: &str = "https://access.line.me";

/// Marker the LINE in-app browser puts in its user agent
const IN_CLIENT_UA_MARKER: &str = "Line/";

/// Called with the LINE Login URL when a login redirect starts
pub type RedirectHook = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Default)]
struct SessionState {
    liff_id: Option<String>,
    channel_id: Option<String>,
    logged_in: bool,
}

/// [`IdentitySdk`] backed by the LINE Platform HTTP API
pub struct LineSdk {
    client: Client,
    api_base: String,
    login_base: String,
    access_token: Option<String>,
    redirect_uri: Option<String>,
    user_agent: Option<String>,
    redirect_hook: Option<RedirectHook>,
    state: Mutex<SessionState>,
}

impl LineSdk {
    /// Create an SDK talking to the public LINE endpoints
    pub fn new(config: &LineConfig) -> Result<Self, SdkError> {
        Self::with_endpoints(config, LINE_API_BASE, LINE_LOGIN_BASE)
    }

    /// Create an SDK against custom API / login hosts
    pub fn with_endpoints(config: &LineConfig, api_base: &str, login_base: &str) -> Result<Self, SdkError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            login_base: login_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            redirect_uri: config.redirect_uri.clone(),
            user_agent: config.user_agent.clone(),
            redirect_hook: None,
            state: Mutex::new(SessionState::default()),
        })
    }

    /// Receive the LINE Login URL whenever `login()` runs
    pub fn with_redirect_hook(mut self, hook: RedirectHook) -> Self {
        self.redirect_hook = Some(hook);
        self
    }

    /// LINE Login authorize URL for the initialized channel
    pub fn login_url(&self) -> Result<Url, SdkError> {
        let (liff_id, channel_id) = {
            let state = self.lock_state();
            match (&state.liff_id, &state.channel_id) {
                (Some(liff_id), Some(channel_id)) => (liff_id.clone(), channel_id.clone()),
                _ => return Err(SdkError::NotInitialized),
            }
        };

        // LIFF falls back to the app's own endpoint
        let redirect_uri = self
            .redirect_uri
            .clone()
            .unwrap_or_else(|| format!("https://liff.line.me/{}", liff_id));
        let state = uuid::Uuid::new_v4().simple().to_string();

        Url::parse_with_params(
            &format!("{}/oauth2/v2.1/authorize", self.login_base),
            &[
                ("response_type", "code"),
                ("client_id", channel_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("state", state.as_str()),
                ("scope", "profile openid"),
            ],
        )
        .map_err(|e| SdkError::ApiError(format!("Invalid login URL: {}", e)))
    }

    /// Verify the configured access token for `channel_id`
    async fn verify_token(&self, token: &str, channel_id: &str) -> Result<bool, SdkError> {
        let url = format!("{}/oauth2/v2.1/verify", self.api_base);

        debug!("Verifying access token");

        let response = self
            .client
            .get(&url)
            .query(&[("access_token", token)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            warn!("Access token rejected: {}", status);
            return Ok(false);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Verify access token failed: {} - {}", status, error_text);
            return Err(SdkError::ApiError(format!("{}: {}", status, error_text)));
        }

        let verification: TokenVerification = response
            .json()
            .await
            .map_err(|e| SdkError::ParseError(e.to_string()))?;

        if verification.client_id != channel_id {
            warn!(
                "Access token belongs to channel {}, expected {}",
                verification.client_id, channel_id
            );
            return Ok(false);
        }

        Ok(verification.expires_in > 0)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Channel ID part of a LIFF ID (`<channelId>-<suffix>`)
fn channel_id_of(liff_id: &str) -> Result<&str, SdkError> {
    match liff_id.split_once('-') {
        Some((channel, suffix))
            if !channel.is_empty() && !suffix.is_empty() && channel.chars().all(|c| c.is_ascii_digit()) =>
        {
            Ok(channel)
        }
        _ => Err(SdkError::InvalidLiffId(liff_id.to_string())),
    }
}

#[async_trait]
impl IdentitySdk for LineSdk {
    async fn init(&self, liff_id: &str) -> Result<(), SdkError> {
        let channel_id = channel_id_of(liff_id)?;

        let logged_in = match self.access_token.as_deref() {
            Some(token) => self.verify_token(token, channel_id).await?,
            None => false,
        };

        let mut state = self.lock_state();
        state.liff_id = Some(liff_id.to_string());
        state.channel_id = Some(channel_id.to_string());
        state.logged_in = logged_in;

        info!("LINE SDK initialized for channel {} (logged in: {})", channel_id, logged_in);
        Ok(())
    }

    fn is_logged_in(&self) -> bool {
        self.lock_state().logged_in
    }

    fn login(&self) {
        let url = match self.login_url() {
            Ok(url) => url,
            Err(e) => {
                error!("Cannot start LINE Login: {}", e);
                return;
            }
        };

        info!("Redirecting to LINE Login: {}", url);
        if let Some(hook) = &self.redirect_hook {
            hook(url.as_str());
        }
    }

    async fn get_profile(&self) -> Result<LineProfile, SdkError> {
        {
            let state = self.lock_state();
            if state.channel_id.is_none() {
                return Err(SdkError::NotInitialized);
            }
            if !state.logged_in {
                return Err(SdkError::NotLoggedIn);
            }
        }
        let token = self.access_token.as_deref().ok_or(SdkError::NotLoggedIn)?;

        let url = format!("{}/v2/profile", self.api_base);

        debug!("Getting profile");

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Get profile failed: {} - {}", status, error_text);
            return Err(SdkError::ApiError(format!("{}: {}", status, error_text)));
        }

        let profile: LineProfile = response
            .json()
            .await
            .map_err(|e| SdkError::ParseError(e.to_string()))?;

        info!("Got profile for user: {}", profile.display_name);
        Ok(profile)
    }

    fn is_in_client(&self) -> Result<bool, SdkError> {
        if self.lock_state().channel_id.is_none() {
            return Err(SdkError::NotInitialized);
        }

        Ok(self
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.contains(IN_CLIENT_UA_MARKER)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{IdentityBootstrap, InitOutcome};
    use futures::future::join_all;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIFF_ID: &str = "1650000000-AbCdEfGh";

    fn config(token: Option<&str>) -> LineConfig {
        LineConfig {
            liff_id: Some(LIFF_ID.to_string()),
            access_token: token.map(str::to_string),
            redirect_uri: Some("https://booking.example.com/callback".to_string()),
            user_agent: None,
        }
    }

    async fn mount_verify(server: &MockServer, status: u16, client_id: &str) {
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .and(query_param("access_token", "valid-token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "scope": "profile openid",
                "client_id": client_id,
                "expires_in": 2591659,
            })))
            .mount(server)
            .await;
    }

    async fn mount_profile(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v2/profile"))
            .and(header("authorization", "Bearer valid-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "userId": "U4af4980629",
                "displayName": "Brown",
                "statusMessage": "Hello, LINE!",
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_channel_id_of() {
        assert_eq!(channel_id_of("1650000000-AbCdEfGh").unwrap(), "1650000000");
        for bad in ["", "1650000000", "-abc", "1650000000-", "abc-def"] {
            assert_eq!(channel_id_of(bad), Err(SdkError::InvalidLiffId(bad.to_string())));
        }
    }

    #[tokio::test]
    async fn test_init_with_valid_token_logs_in() {
        let server = MockServer::start().await;
        mount_verify(&server, 200, "1650000000").await;
        mount_profile(&server).await;

        let sdk = LineSdk::with_endpoints(&config(Some("valid-token")), &server.uri(), &server.uri()).unwrap();
        assert!(!sdk.is_logged_in());

        sdk.init(LIFF_ID).await.unwrap();
        assert!(sdk.is_logged_in());

        let profile = sdk.get_profile().await.unwrap();
        assert_eq!(profile.user_id, "U4af4980629");
        assert_eq!(profile.display_name, "Brown");
        assert_eq!(profile.status_message.as_deref(), Some("Hello, LINE!"));
    }

    #[tokio::test]
    async fn test_init_without_token_is_logged_out() {
        let server = MockServer::start().await;
        let sdk = LineSdk::with_endpoints(&config(None), &server.uri(), &server.uri()).unwrap();

        sdk.init(LIFF_ID).await.unwrap();

        assert!(!sdk.is_logged_in());
        assert_eq!(sdk.get_profile().await.unwrap_err(), SdkError::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_init_with_rejected_token_is_logged_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_request",
                "error_description": "access token expired",
            })))
            .mount(&server)
            .await;

        let sdk = LineSdk::with_endpoints(&config(Some("expired")), &server.uri(), &server.uri()).unwrap();
        sdk.init(LIFF_ID).await.unwrap();

        assert!(!sdk.is_logged_in());
    }

    #[tokio::test]
    async fn test_init_with_token_for_other_channel_is_logged_out() {
        let server = MockServer::start().await;
        mount_verify(&server, 200, "1999999999").await;

        let sdk = LineSdk::with_endpoints(&config(Some("valid-token")), &server.uri(), &server.uri()).unwrap();
        sdk.init(LIFF_ID).await.unwrap();

        assert!(!sdk.is_logged_in());
    }

    #[tokio::test]
    async fn test_init_verify_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let sdk = LineSdk::with_endpoints(&config(Some("valid-token")), &server.uri(), &server.uri()).unwrap();
        let err = sdk.init(LIFF_ID).await.unwrap_err();

        assert!(matches!(err, SdkError::ApiError(msg) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_init_invalid_liff_id() {
        let sdk = LineSdk::new(&config(None)).unwrap();
        assert_eq!(
            sdk.init("not-a-liff-id").await.unwrap_err(),
            SdkError::InvalidLiffId("not-a-liff-id".to_string())
        );
    }

    #[tokio::test]
    async fn test_calls_before_init() {
        let sdk = LineSdk::new(&config(Some("valid-token"))).unwrap();

        assert_eq!(sdk.is_in_client(), Err(SdkError::NotInitialized));
        assert_eq!(sdk.get_profile().await.unwrap_err(), SdkError::NotInitialized);
        assert!(matches!(sdk.login_url(), Err(SdkError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_is_in_client_uses_user_agent() {
        let server = MockServer::start().await;
        let mut cfg = config(None);
        cfg.user_agent = Some("Mozilla/5.0 (iPhone) AppleWebKit/605.1.15 Safari Line/13.4.1 LIFF".to_string());
        let sdk = LineSdk::with_endpoints(&cfg, &server.uri(), &server.uri()).unwrap();
        sdk.init(LIFF_ID).await.unwrap();
        assert_eq!(sdk.is_in_client(), Ok(true));

        cfg.user_agent = Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".to_string());
        let sdk = LineSdk::with_endpoints(&cfg, &server.uri(), &server.uri()).unwrap();
        sdk.init(LIFF_ID).await.unwrap();
        assert_eq!(sdk.is_in_client(), Ok(false));
    }

    #[tokio::test]
    async fn test_login_hands_authorize_url_to_hook() {
        let server = MockServer::start().await;
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);

        let sdk = LineSdk::with_endpoints(&config(None), &server.uri(), "https://access.line.me/")
            .unwrap()
            .with_redirect_hook(Arc::new(move |url: &str| sink.lock().unwrap().push(url.to_string())));
        sdk.init(LIFF_ID).await.unwrap();
        sdk.login();

        let urls = seen.lock().unwrap();
        assert_eq!(urls.len(), 1);
        let url = Url::parse(&urls[0]).unwrap();
        assert_eq!(url.path(), "/oauth2/v2.1/authorize");
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "1650000000");
        assert_eq!(params["redirect_uri"], "https://booking.example.com/callback");
        assert_eq!(params["scope"], "profile openid");
        assert!(!params["state"].is_empty());
    }

    #[tokio::test]
    async fn test_login_url_defaults_to_liff_endpoint() {
        let server = MockServer::start().await;
        let mut cfg = config(None);
        cfg.redirect_uri = None;
        let sdk = LineSdk::with_endpoints(&cfg, &server.uri(), &server.uri()).unwrap();
        sdk.init(LIFF_ID).await.unwrap();

        let url = sdk.login_url().unwrap();
        let redirect = url
            .query_pairs()
            .find(|(k, _)| k == "redirect_uri")
            .map(|(_, v)| v.into_owned());
        assert_eq!(redirect.as_deref(), Some("https://liff.line.me/1650000000-AbCdEfGh"));
    }

    #[tokio::test]
    async fn test_bootstrap_verifies_token_once_for_concurrent_profiles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/v2.1/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scope": "profile",
                "client_id": "1650000000",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_profile(&server).await;

        let cfg = config(Some("valid-token"));
        let sdk = LineSdk::with_endpoints(&cfg, &server.uri(), &server.uri()).unwrap();
        let bootstrap = IdentityBootstrap::from_config(Arc::new(sdk), &cfg);

        let profiles = join_all((0..5).map(|_| bootstrap.get_profile())).await;

        for profile in profiles {
            assert_eq!(profile.unwrap().user_id, "U4af4980629");
        }
        assert_eq!(bootstrap.init_liff().await.unwrap(), InitOutcome::Ready);
        server.verify().await;
    }
}
