//! Environment-driven configuration.

use crate::error::{GenEditError, Result};
use crate::locale::Locale;

/// Env var holding the bearer key for the chat-completion endpoint.
pub const API_KEY_ENV: &str = "IMAGE_EDIT_API_KEY";
/// Env var holding the API base URL (the part before `/chat/completions`).
pub const BASE_URL_ENV: &str = "IMAGE_EDIT_BASE_URL";
/// Env var overriding the model identifier.
pub const MODEL_ENV: &str = "IMAGE_EDIT_MODEL";
/// Env var selecting the message locale.
pub const LOCALE_ENV: &str = "IMAGE_EDIT_LOCALE";
/// Env var holding a secondary key used by external collaborators.
pub const ALT_API_KEY_ENV: &str = "IMAGE_EDIT_ALT_API_KEY";
/// Env var toggling watermark detection in the UI.
pub const WATERMARK_ENABLED_ENV: &str = "WATERMARK_ENABLED";
/// Env var holding the watermark text.
pub const WATERMARK_TEXT_ENV: &str = "WATERMARK_TEXT";

/// Watermark settings. Carried for collaborators; the adapter ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatermarkConfig {
    /// Whether watermark checks are enabled.
    pub enabled: bool,
    /// Expected watermark text.
    pub text: Option<String>,
}

/// Resolved application configuration.
#[derive(Clone)]
pub struct EditorConfig {
    /// Bearer key for the API.
    pub api_key: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Model override.
    pub model: Option<String>,
    /// Message locale.
    pub locale: Locale,
    /// Alternate key, unused by the adapter.
    pub alt_api_key: Option<String>,
    /// Watermark settings.
    pub watermark: WatermarkConfig,
}

impl EditorConfig {
    /// Loads configuration from the process environment.
    ///
    /// Fails when the API key or base URL is missing, so callers can abort at
    /// startup instead of on the first request.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV)
            .ok_or_else(|| GenEditError::Config(format!("{API_KEY_ENV} not set")))?;
        let base_url = get(BASE_URL_ENV)
            .ok_or_else(|| GenEditError::Config(format!("{BASE_URL_ENV} not set")))?;

        let locale = match get(LOCALE_ENV) {
            Some(raw) => raw.parse().map_err(GenEditError::Config)?,
            None => Locale::default(),
        };

        Ok(Self {
            api_key,
            base_url,
            model: get(MODEL_ENV),
            locale,
            alt_api_key: get(ALT_API_KEY_ENV),
            watermark: WatermarkConfig {
                enabled: get(WATERMARK_ENABLED_ENV)
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
                text: get(WATERMARK_TEXT_ENV),
            },
        })
    }
}

impl std::fmt::Debug for EditorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("locale", &self.locale)
            .field("alt_api_key", &self.alt_api_key.as_deref().map(redact))
            .field("watermark", &self.watermark)
            .finish()
    }
}

/// Masks all but the last four characters of a secret.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".into();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
