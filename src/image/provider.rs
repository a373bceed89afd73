//! Image editor trait.

use crate::error::Result;
use crate::image::types::{EditRequest, GeneratedContent, ImageInput, MaskInput};
use crate::locale::Locale;
use async_trait::async_trait;

/// Trait for backends that edit an image from a text instruction.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Edits the image described by `request`.
    ///
    /// A successful result always carries an image reference.
    async fn edit(&self, request: &EditRequest) -> Result<GeneratedContent>;

    /// Returns the name of this editor for display.
    fn name(&self) -> &str;

    /// Returns the locale this editor reports errors in.
    fn locale(&self) -> Locale {
        Locale::default()
    }
}

/// Positional convenience wrapper over [`ImageEditor::edit`].
#[async_trait]
pub trait ImageEditorExt: ImageEditor {
    /// Edits a base64 image with an optional base64 mask and secondary image.
    async fn edit_image(
        &self,
        image: &str,
        mime_type: &str,
        instruction: &str,
        mask: Option<&str>,
        secondary_image: Option<ImageInput>,
    ) -> Result<GeneratedContent> {
        let mut request = EditRequest::new(ImageInput::inline(image, mime_type), instruction);
        if let Some(mask) = mask {
            request = request.with_mask(MaskInput::new(mask));
        }
        if let Some(secondary) = secondary_image {
            request = request.with_secondary_image(secondary);
        }
        self.edit(&request).await
    }
}

impl<T: ImageEditor + ?Sized> ImageEditorExt for T {}
