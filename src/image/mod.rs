//! Image editing module.

pub mod extract;
mod provider;
pub mod providers;
mod types;

pub use provider::{ImageEditor, ImageEditorExt};
pub use types::{
    AspectRatio, EditRequest, GeneratedContent, ImageFormat, ImageInput, MaskInput,
};
