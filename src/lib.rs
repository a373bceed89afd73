#![warn(missing_docs)]
//! GenEdit - image editing over multimodal chat-completion APIs.
//!
//! This crate sends an image, an instruction, and optional mask and
//! reference images to an OpenAI-compatible `/chat/completions` endpoint,
//! then pulls the edited image reference back out of the model's text reply.
//!
//! # Quick Start - Editing
//!
//! ```no_run
//! use genedit::{ChatEditProvider, EditRequest, ImageEditor, ImageInput};
//!
//! #[tokio::main]
//! async fn main() -> genedit::Result<()> {
//!     let provider = ChatEditProvider::builder()
//!         .api_key("sk-...")
//!         .base_url("https://api.example.com/v1")
//!         .build()?;
//!     let image = ImageInput::from_bytes(&std::fs::read("cat.jpg")?);
//!     let request = EditRequest::new(image, "Give the cat a tiny hat");
//!     let content = provider.edit(&request).await?;
//!     content.save_image("cat-hat.png")?;
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Simulated Video
//!
//! ```no_run
//! use genedit::{ChatEditProvider, SimulatedVideoProvider, VideoGenerationRequest, VideoProvider};
//!
//! #[tokio::main]
//! async fn main() -> genedit::Result<()> {
//!     let provider = SimulatedVideoProvider::new(ChatEditProvider::from_env()?);
//!     let request = VideoGenerationRequest::new("Waves at sunset");
//!     let content = provider.generate(&request, None).await?;
//!     println!("{:?}", content.text);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `genedit` command-line tool

pub mod config;
mod error;
pub mod image;
pub mod locale;
pub mod video;

// Re-export error types at crate root
pub use error::{GenEditError, Result};

pub use config::EditorConfig;
pub use image::providers::{ChatEditProvider, ChatEditProviderBuilder};
pub use image::{
    AspectRatio, EditRequest, GeneratedContent, ImageEditor, ImageEditorExt, ImageFormat,
    ImageInput, MaskInput,
};
pub use locale::Locale;
pub use video::providers::SimulatedVideoProvider;
pub use video::{ProgressCallback, VideoGenerationRequest, VideoProvider};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{GenEditError, Result};
    pub use crate::image::providers::ChatEditProvider;
    pub use crate::image::{
        EditRequest, GeneratedContent, ImageEditor, ImageEditorExt, ImageInput, MaskInput,
    };
    pub use crate::video::providers::SimulatedVideoProvider;
    pub use crate::video::{VideoGenerationRequest, VideoProvider};
}
