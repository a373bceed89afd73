//! Error types for image editing.

use crate::locale::Locale;
use serde::Deserialize;

/// Errors that can occur while editing images or simulating video.
#[derive(Debug, thiserror::Error)]
pub enum GenEditError {
    /// API key or base URL missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message derived from the response body or status line.
        message: String,
        /// Raw response body, kept for vendor error classification.
        body: Option<String>,
    },

    /// Response was missing choices or message content.
    #[error("{0}")]
    MalformedResponse(String),

    /// The model answered without an image reference.
    #[error("{0}")]
    NoImage(String),

    /// Vendor reported an exhausted quota.
    #[error("{0}")]
    RateLimited(String),

    /// Vendor reported a transient server failure.
    #[error("{0}")]
    ServerUnavailable(String),

    /// Vendor error message passed through as-is.
    #[error("{0}")]
    Vendor(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Simulated video generation failed.
    #[error("{0}")]
    VideoGeneration(String),

    /// Error that carried no usable description.
    #[error("{0}")]
    Unknown(String),
}

impl GenEditError {
    /// Returns true if this error was remapped from a recognized vendor error body.
    pub fn is_vendor_mapped(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::ServerUnavailable(_) | Self::Vendor(_)
        )
    }

    /// Reclassifies transport and response errors whose message (or raw body)
    /// is a known vendor error document. Anything unrecognized passes through.
    pub fn normalize(self, locale: Locale) -> Self {
        let candidates: Vec<String> = match &self {
            Self::Api { message, body, .. } => {
                let mut c = vec![message.clone()];
                c.extend(body.clone());
                c
            }
            Self::MalformedResponse(_) | Self::Network(_) | Self::Json(_) => {
                vec![self.to_string()]
            }
            _ => Vec::new(),
        };
        if candidates.is_empty() {
            return self;
        }

        if let Some(vendor) = candidates.iter().find_map(|c| VendorError::parse(c)) {
            tracing::warn!(
                status = vendor.status_str().unwrap_or(""),
                "vendor error: {}",
                vendor.message
            );
            return vendor.into_error(locale);
        }

        if self.to_string().trim().is_empty() {
            return Self::Unknown(locale.messages().unknown_error.to_string());
        }
        self
    }
}

/// Vendor error document, `{"error": {"message", "status"?, "code"?}}`.
#[derive(Debug, Deserialize)]
struct VendorErrorEnvelope {
    error: VendorError,
}

#[derive(Debug, Deserialize)]
struct VendorError {
    message: String,
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl VendorError {
    fn parse(text: &str) -> Option<Self> {
        serde_json::from_str::<VendorErrorEnvelope>(text.trim())
            .ok()
            .map(|envelope| envelope.error)
    }

    /// Symbolic status such as `RESOURCE_EXHAUSTED`; numeric statuses have none.
    fn status_str(&self) -> Option<&str> {
        self.status.as_ref().and_then(serde_json::Value::as_str)
    }

    fn is_server_error(&self) -> bool {
        let code_500 = match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(500),
            Some(serde_json::Value::String(s)) => s == "500",
            _ => false,
        };
        code_500 || self.status_str() == Some("UNKNOWN")
    }

    fn into_error(self, locale: Locale) -> GenEditError {
        let messages = locale.messages();
        if self.status_str() == Some("RESOURCE_EXHAUSTED") {
            GenEditError::RateLimited(messages.rate_limited.to_string())
        } else if self.is_server_error() {
            GenEditError::ServerUnavailable(messages.server_unavailable.to_string())
        } else {
            GenEditError::Vendor(self.message)
        }
    }
}

/// Result type alias for image editing operations.
pub type Result<T> = std::result::Result<T, GenEditError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(message: &str, body: Option<&str>) -> GenEditError {
        GenEditError::Api {
            status: 429,
            message: message.into(),
            body: body.map(String::from),
        }
    }

    #[test]
    fn test_resource_exhausted_maps_to_rate_limit() {
        let body = r#"{"error":{"message":"X","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = api_error("X", Some(body)).normalize(Locale::En);
        assert!(matches!(err, GenEditError::RateLimited(_)));
        assert_eq!(err.to_string(), Locale::En.messages().rate_limited);
        assert_ne!(err.to_string(), "X");
    }

    #[test]
    fn test_code_500_and_unknown_status_map_to_server_error() {
        let numeric = r#"{"error":{"message":"boom","code":500}}"#;
        let err = api_error("boom", Some(numeric)).normalize(Locale::En);
        assert!(matches!(err, GenEditError::ServerUnavailable(_)));

        let textual = r#"{"error":{"message":"boom","code":"500"}}"#;
        let err = api_error("boom", Some(textual)).normalize(Locale::En);
        assert!(matches!(err, GenEditError::ServerUnavailable(_)));

        let unknown = r#"{"error":{"message":"boom","status":"UNKNOWN"}}"#;
        let err = api_error("boom", Some(unknown)).normalize(Locale::Zh);
        assert_eq!(err.to_string(), Locale::Zh.messages().server_unavailable);
    }

    #[test]
    fn test_other_vendor_errors_keep_vendor_message() {
        let body = r#"{"error":{"message":"Invalid model","status":"INVALID_ARGUMENT","code":400}}"#;
        let err = api_error("Invalid model", Some(body)).normalize(Locale::En);
        assert!(matches!(err, GenEditError::Vendor(_)));
        assert_eq!(err.to_string(), "Invalid model");
    }

    #[test]
    fn test_numeric_status_still_parses_as_vendor_error() {
        let err = GenEditError::Api {
            status: 400,
            message: "X".into(),
            body: Some(r#"{"error":{"message":"X","status":400}}"#.into()),
        }
        .normalize(Locale::En);
        assert!(matches!(err, GenEditError::Vendor(_)));
        assert_eq!(err.to_string(), "X");
    }

    #[test]
    fn test_message_itself_may_be_vendor_json() {
        let msg = r#"{"error":{"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = GenEditError::MalformedResponse(msg.into()).normalize(Locale::En);
        assert!(err.is_vendor_mapped());
    }

    #[test]
    fn test_unparseable_messages_pass_through() {
        let err = api_error("Bad gateway from upstream", Some("<html>502</html>"))
            .normalize(Locale::En);
        assert_eq!(err.to_string(), "API error: 429 - Bad gateway from upstream");

        let err = GenEditError::MalformedResponse("not json {".into()).normalize(Locale::En);
        assert_eq!(err.to_string(), "not json {");
    }

    #[test]
    fn test_no_image_is_never_reclassified() {
        let text = r#"{"error":{"message":"x","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = GenEditError::NoImage(text.into()).normalize(Locale::En);
        assert_eq!(err.to_string(), text);
    }

    #[test]
    fn test_empty_message_becomes_unknown() {
        let err = GenEditError::MalformedResponse(String::new()).normalize(Locale::En);
        assert!(matches!(err, GenEditError::Unknown(_)));
        assert_eq!(err.to_string(), Locale::En.messages().unknown_error);
    }

    #[test]
    fn test_error_display() {
        let err = GenEditError::Api {
            status: 404,
            message: "Not found".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = GenEditError::Config("IMAGE_EDIT_API_KEY not set".into());
        assert_eq!(
            err.to_string(),
            "configuration error: IMAGE_EDIT_API_KEY not set"
        );
    }
}
