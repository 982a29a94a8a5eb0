//! LIFF bootstrap
//!
//! Initializes the identity SDK at most once per page load, sends
//! unauthenticated users to LINE Login and exposes the user's profile.
//!
//! The initialization outcome is write-once. Concurrent callers share the
//! single in-flight request, and a failed initialization is remembered: a new
//! page load (a new `IdentityBootstrap`) is the only way to try again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use rb_core::LineConfig;

use crate::error::{LineError, Result, SdkError};
use crate::sdk::IdentitySdk;
use crate::types::LineProfile;

type InitFuture = Shared<BoxFuture<'static, std::result::Result<(), SdkError>>>;

/// When the login check runs relative to SDK initialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginPolicy {
    /// Initialize first, then check login
    #[default]
    InitializeFirst,
    /// Inside the LINE client with a user already logged in, skip
    /// initialization entirely. Everything else behaves like `InitializeFirst`.
    InClientFastPath,
}

/// Result of [`IdentityBootstrap::init_liff`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Initialized and logged in; the profile can be fetched
    Ready,
    /// Login was started. The page is about to navigate away, so the caller
    /// should drop whatever it was doing.
    LoginRedirect,
}

/// Observable initialization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initializing,
    Initialized,
    Failed,
}

enum Slot {
    Uninitialized,
    Initializing(InitFuture),
    Initialized,
    Failed(SdkError),
}

/// Owns the identity SDK and its one-shot initialization
pub struct IdentityBootstrap {
    sdk: Arc<dyn IdentitySdk>,
    liff_id: Option<String>,
    policy: LoginPolicy,
    slot: Mutex<Slot>,
}

impl IdentityBootstrap {
    pub fn new(sdk: Arc<dyn IdentitySdk>, liff_id: Option<String>, policy: LoginPolicy) -> Self {
        Self {
            sdk,
            liff_id,
            policy,
            slot: Mutex::new(Slot::Uninitialized),
        }
    }

    /// Bootstrap using the LIFF ID from configuration and the default policy
    pub fn from_config(sdk: Arc<dyn IdentitySdk>, config: &LineConfig) -> Self {
        Self::new(sdk, config.liff_id.clone(), LoginPolicy::default())
    }

    pub fn policy(&self) -> LoginPolicy {
        self.policy
    }

    pub fn state(&self) -> InitState {
        match &*self.lock_slot() {
            Slot::Uninitialized => InitState::Uninitialized,
            Slot::Initializing(_) => InitState::Initializing,
            Slot::Initialized => InitState::Initialized,
            Slot::Failed(_) => InitState::Failed,
        }
    }

    /// Make sure the SDK is initialized and the user is logged in.
    ///
    /// Returns `LoginRedirect` (not an error) when login had to be started.
    pub async fn init_liff(&self) -> Result<InitOutcome> {
        let liff_id = self
            .liff_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LineError::Config("LIFF_ID is not set".to_string()))?;

        if self.policy == LoginPolicy::InClientFastPath && self.is_in_client() && self.sdk.is_logged_in() {
            debug!("Already logged in inside LINE client, skipping LIFF init");
            return Ok(InitOutcome::Ready);
        }

        self.ensure_initialized(liff_id).await?;

        if !self.sdk.is_logged_in() {
            info!("User is not logged in, redirecting to LINE Login");
            self.sdk.login();
            return Ok(InitOutcome::LoginRedirect);
        }

        Ok(InitOutcome::Ready)
    }

    /// Initialize if needed, then fetch the logged-in user's profile.
    ///
    /// If login had to be started the SDK's own fault for a missing login is
    /// returned; callers should only ask once the user is back from login.
    pub async fn get_profile(&self) -> Result<LineProfile> {
        self.init_liff().await?;
        Ok(self.sdk.get_profile().await?)
    }

    /// Whether we run inside the LINE client. Any SDK fault counts as `false`.
    pub fn is_in_client(&self) -> bool {
        match self.sdk.is_in_client() {
            Ok(in_client) => in_client,
            Err(e) => {
                debug!("isInClient check failed: {}", e);
                false
            }
        }
    }

    /// Run SDK initialization once; every caller observes the same outcome
    async fn ensure_initialized(&self, liff_id: &str) -> std::result::Result<(), SdkError> {
        let pending = {
            let mut slot = self.lock_slot();
            match &*slot {
                Slot::Initialized => return Ok(()),
                Slot::Failed(e) => return Err(e.clone()),
                Slot::Initializing(pending) => pending.clone(),
                Slot::Uninitialized => {
                    debug!("Initializing LIFF: {}", liff_id);
                    let sdk = Arc::clone(&self.sdk);
                    let liff_id = liff_id.to_string();
                    let pending = async move { sdk.init(&liff_id).await }.boxed().shared();
                    *slot = Slot::Initializing(pending.clone());
                    pending
                }
            }
        };

        let result = pending.await;

        let mut slot = self.lock_slot();
        if let Slot::Initializing(_) = &*slot {
            *slot = match &result {
                Ok(()) => {
                    info!("LIFF initialized");
                    Slot::Initialized
                }
                Err(e) => {
                    warn!("LIFF initialization failed: {}", e);
                    Slot::Failed(e.clone())
                }
            };
        }

        result
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
