//! OpenAI-compatible chat-completion image editor.
//!
//! Sends the instruction and images as one multimodal user message and reads
//! the edited image back out of the assistant's text reply.

use crate::config::EditorConfig;
use crate::error::{GenEditError, Result};
use crate::image::extract;
use crate::image::provider::ImageEditor;
use crate::image::types::{EditRequest, GeneratedContent};
use crate::locale::Locale;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Builder for ChatEditProvider.
#[derive(Debug, Clone, Default)]
pub struct ChatEditProviderBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    locale: Locale,
    timeout: Option<Duration>,
}

impl ChatEditProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder from a resolved configuration.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            api_key: Some(config.api_key.clone()),
            base_url: Some(config.base_url.clone()),
            model: config.model.clone(),
            locale: config.locale,
            timeout: None,
        }
    }

    /// Sets the bearer API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL, e.g. `https://api.example.com/v1`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the locale for user-facing error messages.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets a transport timeout. Unset means the client default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the provider. Fails without an API key or a valid base URL.
    pub fn build(self) -> Result<ChatEditProvider> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenEditError::Config("API key not provided".into()))?;
        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| GenEditError::Config("base URL not provided".into()))?;

        let parsed = url::Url::parse(base_url.trim())
            .map_err(|e| GenEditError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GenEditError::Config(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(ChatEditProvider {
            client: client.build()?,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim().trim_end_matches('/')),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            locale: self.locale,
        })
    }
}

/// Image editor backed by a `/chat/completions` endpoint.
pub struct ChatEditProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    locale: Locale,
}

impl ChatEditProvider {
    /// Creates a new `ChatEditProviderBuilder`.
    pub fn builder() -> ChatEditProviderBuilder {
        ChatEditProviderBuilder::new()
    }

    /// Builds a provider straight from the environment.
    pub fn from_env() -> Result<Self> {
        ChatEditProviderBuilder::from_config(&EditorConfig::from_env()?).build()
    }

    /// Returns the full completion endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Serializes the request body exactly as it is sent.
    pub fn request_body(&self, request: &EditRequest) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&ChatRequest::from_edit_request(
            request,
            &self.model,
        ))?)
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<GeneratedContent> {
        let start = Instant::now();
        let body = self.request_body(request)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            has_mask = request.mask.is_some(),
            has_secondary = request.secondary_image.is_some(),
            "submitting image edit request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(transport_error(status, &text));
        }

        let text = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&text)?;
        let content = parse_choice_content(chat, self.locale)?;
        let result = content_to_result(&content, self.locale)?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            has_text = result.text.is_some(),
            "image edit complete"
        );
        Ok(result)
    }
}

#[async_trait]
impl ImageEditor for ChatEditProvider {
    async fn edit(&self, request: &EditRequest) -> Result<GeneratedContent> {
        self.edit_impl(request).await.map_err(|e| {
            tracing::warn!("image edit failed: {e}");
            e.normalize(self.locale)
        })
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn locale(&self) -> Locale {
        self.locale
    }
}

/// Instruction used when a mask limits the edit.
pub(crate) fn masked_instruction(instruction: &str) -> String {
    format!(
        "Apply the following instruction only to the masked area of the image: '{instruction}'. Preserve the unmasked area."
    )
}

/// Builds an API error from a non-success response.
///
/// The message is `error.message`, then `message` from a JSON body, then the
/// raw body, then the status line.
pub(crate) fn transport_error(status: reqwest::StatusCode, text: &str) -> GenEditError {
    let from_json = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .or_else(|| v.get("message").and_then(|m| m.as_str()))
                .map(String::from)
        })
        .filter(|m| !m.trim().is_empty());

    let message = from_json.unwrap_or_else(|| {
        if text.trim().is_empty() {
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        } else {
            text.to_string()
        }
    });

    GenEditError::Api {
        status: status.as_u16(),
        message,
        body: (!text.is_empty()).then(|| text.to_string()),
    }
}

fn parse_choice_content(response: ChatResponse, locale: Locale) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| GenEditError::MalformedResponse(locale.messages().malformed_response.into()))
}

/// Turns assistant text into a result, failing when it holds no image.
pub(crate) fn content_to_result(content: &str, locale: Locale) -> Result<GeneratedContent> {
    let extracted = extract::extract(content);
    match extracted.image_url {
        Some(image_url) => Ok(GeneratedContent {
            image_url: Some(image_url),
            text: extracted.text,
            video_url: None,
        }),
        None => Err(GenEditError::NoImage(
            extracted
                .text
                .unwrap_or_else(|| locale.messages().no_image.to_string()),
        )),
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    stream: bool,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, PartialEq)]
struct ImageUrl {
    url: String,
}

impl ContentBlock {
    fn image(url: String) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url },
        }
    }
}

impl ChatRequest {
    fn from_edit_request(req: &EditRequest, model: &str) -> Self {
        let mut content = vec![
            ContentBlock::Text {
                text: req.instruction.clone(),
            },
            ContentBlock::image(req.image.to_url()),
        ];

        if let Some(ref mask) = req.mask {
            content[0] = ContentBlock::Text {
                text: masked_instruction(&req.instruction),
            };
            content.push(ContentBlock::image(mask.to_url()));
        }

        if let Some(ref secondary) = req.secondary_image {
            content.push(ContentBlock::image(secondary.to_url()));
        }

        Self {
            model: model.to_string(),
            stream: false,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
