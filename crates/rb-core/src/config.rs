//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. room-booking.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::Error;

/// Backend used when no base URL is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:10000";

/// Default config file looked up by [`Config::load`]
const CONFIG_FILE: &str = "room-booking.toml";

/// Booking backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ApiConfig {
    /// Build from a raw value; empty or missing falls back to the default
    pub fn from_base_url(raw: Option<&str>) -> Self {
        match raw {
            Some(url) if !url.is_empty() => Self {
                base_url: normalize_base_url(url),
            },
            _ => Self::default(),
        }
    }
}

/// Strip a single trailing `/` from a base URL
pub fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// LINE (LIFF / LINE Login) configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineConfig {
    /// LIFF app ID (`<channelId>-<suffix>`). Only required once identity is used.
    pub liff_id: Option<String>,

    /// Access token obtained from a previous LINE Login
    pub access_token: Option<String>,

    /// Where LINE Login should send the user back to
    pub redirect_uri: Option<String>,

    /// User agent of the hosting browser, used for the in-client check
    pub user_agent: Option<String>,
}

/// Main configuration for room-booking
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Booking backend
    #[serde(default)]
    pub api: ApiConfig,

    /// LINE identity
    #[serde(default)]
    pub line: LineConfig,
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換されます。
    /// その後、環境変数で上書きされます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&Self::expand_env_vars(&toml_content))?;
        cfg.apply_overrides(|key| std::env::var(key).ok());

        debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./room-booking.toml` があればそれを、なければ環境変数のみを使います。
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    fn from_toml_str(content: &str) -> crate::Result<Self> {
        let toml: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        let api = toml.api.unwrap_or_default();
        let line = toml.line.unwrap_or_default();

        Ok(Config {
            api: ApiConfig::from_base_url(api.base_url.as_deref()),
            line: LineConfig {
                liff_id: non_empty(line.liff_id),
                access_token: non_empty(line.access_token),
                redirect_uri: non_empty(line.redirect_uri),
                user_agent: non_empty(line.user_agent),
            },
        })
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        cfg.apply_overrides(lookup);
        cfg
    }

    /// 環境変数で設定を上書きする（空文字列は未設定扱い）
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |primary: &str, legacy: &str| {
            non_empty(lookup(primary)).or_else(|| non_empty(lookup(legacy)))
        };

        if let Some(base_url) = get("API_BASE", "VITE_API_BASE") {
            self.api = ApiConfig::from_base_url(Some(&base_url));
        }
        if let Some(liff_id) = get("LIFF_ID", "VITE_LIFF_ID") {
            self.line.liff_id = Some(liff_id);
        }
        if let Some(token) = non_empty(lookup("LINE_ACCESS_TOKEN")) {
            self.line.access_token = Some(token);
        }
        if let Some(uri) = non_empty(lookup("LINE_REDIRECT_URI")) {
            self.line.redirect_uri = Some(uri);
        }
        if let Some(ua) = non_empty(lookup("LINE_USER_AGENT")) {
            self.line.user_agent = Some(ua);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    api: Option<TomlApiConfig>,
    line: Option<TomlLineConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    #[serde(default)]
    base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLineConfig {
    #[serde(default)]
    liff_id: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    redirect_uri: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
}
