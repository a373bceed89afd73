//! Simulated video generation on top of an image editor.
//!
//! There is no video model behind this provider: it asks the wrapped editor
//! for a still image, waits a fixed delay, and returns the image together
//! with an empty placeholder video reference.

use crate::error::{GenEditError, Result};
use crate::image::{EditRequest, GeneratedContent, ImageEditor, ImageInput};
use crate::locale::Locale;
use crate::video::provider::VideoProvider;
use crate::video::types::{ProgressCallback, VideoGenerationRequest};
use async_trait::async_trait;
use std::time::Duration;

/// Video reference returned with every result. Carries no payload.
pub const PLACEHOLDER_VIDEO_URL: &str = "data:video/mp4;base64,";

const DEFAULT_DELAY: Duration = Duration::from_secs(3);
const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Video provider that delegates to an [`ImageEditor`].
pub struct SimulatedVideoProvider<E> {
    editor: E,
    delay: Duration,
    locale: Locale,
}

impl<E: ImageEditor> SimulatedVideoProvider<E> {
    /// Wraps `editor` with the default delay, inheriting the editor's locale.
    pub fn new(editor: E) -> Self {
        let locale = editor.locale();
        Self {
            editor,
            delay: DEFAULT_DELAY,
            locale,
        }
    }

    /// Sets the artificial delay between the image result and completion.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the locale for the disclaimer and failure prefix.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Returns the wrapped editor.
    pub fn editor(&self) -> &E {
        &self.editor
    }

    async fn generate_impl(
        &self,
        request: &VideoGenerationRequest,
        report: &(dyn Fn(u8) + Sync),
    ) -> Result<GeneratedContent> {
        report(10);
        report(30);

        let image = request
            .image
            .clone()
            .unwrap_or_else(|| ImageInput::inline("", FALLBACK_MIME_TYPE));
        let edit = EditRequest::new(image, request.annotated_prompt());
        let content = self.editor.edit(&edit).await?;
        report(70);

        tokio::time::sleep(self.delay).await;
        report(100);

        let disclaimer = self.locale.messages().video_disclaimer;
        let text = match content.text {
            Some(text) => format!("{text}\n\n{disclaimer}"),
            None => disclaimer.to_string(),
        };

        Ok(GeneratedContent {
            image_url: content.image_url,
            text: Some(text),
            video_url: Some(PLACEHOLDER_VIDEO_URL.to_string()),
        })
    }
}

#[async_trait]
impl<E: ImageEditor> VideoProvider for SimulatedVideoProvider<E> {
    async fn generate(
        &self,
        request: &VideoGenerationRequest,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<GeneratedContent> {
        let report = |pct: u8| {
            tracing::debug!(progress = pct, "simulated video progress");
            if let Some(cb) = on_progress {
                cb(pct);
            }
        };

        self.generate_impl(request, &report).await.map_err(|e| {
            tracing::warn!("simulated video generation failed: {e}");
            GenEditError::VideoGeneration(format!(
                "{}: {e}",
                self.locale.messages().video_failed
            ))
        })
    }

    fn name(&self) -> &str {
        "Simulated video"
    }
}
