//! Simulated video example - shows progress reporting.
//!
//! Run with: `cargo run --example generate_video`
//!
//! Requires `IMAGE_EDIT_API_KEY` and `IMAGE_EDIT_BASE_URL` environment variables.

use genedit::{
    AspectRatio, ChatEditProvider, ProgressCallback, SimulatedVideoProvider,
    VideoGenerationRequest, VideoProvider,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> genedit::Result<()> {
    let provider = SimulatedVideoProvider::new(ChatEditProvider::from_env()?);

    let request = VideoGenerationRequest::new("Ocean waves crashing on a rocky shore at sunset")
        .with_aspect_ratio(AspectRatio::Portrait);

    let on_progress: ProgressCallback = Arc::new(|pct: u8| println!("progress: {pct}%"));
    let content = provider.generate(&request, Some(&on_progress)).await?;

    println!("Frame: {:?}", content.image_url);
    println!("Video: {:?}", content.video_url);
    if let Some(text) = content.text {
        println!("{text}");
    }

    Ok(())
}
