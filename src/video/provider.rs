//! Video provider trait.

use crate::error::Result;
use crate::image::GeneratedContent;
use crate::video::types::{ProgressCallback, VideoGenerationRequest};
use async_trait::async_trait;

/// Trait for video generation providers.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Generates a video, reporting progress to `on_progress` if given.
    async fn generate(
        &self,
        request: &VideoGenerationRequest,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<GeneratedContent>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;
}
