//! Core types for simulated video generation.

use crate::image::{AspectRatio, ImageInput};
use std::sync::Arc;

/// Observer for generation progress, called with a percentage in `0..=100`.
///
/// Values never decrease within one call.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// A request to generate a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoGenerationRequest {
    /// The text prompt describing the desired video.
    pub prompt: String,
    /// Source image, if any.
    pub image: Option<ImageInput>,
    /// Aspect ratio hint added to the prompt.
    pub aspect_ratio: Option<AspectRatio>,
}

impl VideoGenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            aspect_ratio: None,
        }
    }

    /// Sets a source image for image-to-video generation.
    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Returns the prompt annotated with the aspect ratio hint.
    pub fn annotated_prompt(&self) -> String {
        format!(
            "{}\n\nAspect ratio: {}",
            self.prompt,
            self.aspect_ratio.unwrap_or_default()
        )
    }
}
