//! Image editing example - modifies an existing image with a text prompt.
//!
//! Run with: `cargo run --example edit_image -- <input_image.png> [mask.png]`
//!
//! Requires `IMAGE_EDIT_API_KEY` and `IMAGE_EDIT_BASE_URL` environment variables.

use genedit::{ChatEditProvider, EditRequest, ImageEditor, ImageInput, MaskInput};

#[tokio::main]
async fn main() -> genedit::Result<()> {
    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .expect("Usage: edit_image <input_image.png> [mask.png]");

    let provider = ChatEditProvider::from_env()?;

    let input_bytes = std::fs::read(&input_path)?;
    let mut request = EditRequest::new(
        ImageInput::from_bytes(&input_bytes),
        "Make the colors more vibrant and add a warm sunset glow",
    );
    if let Some(mask_path) = args.next() {
        request = request.with_mask(MaskInput::from_bytes(&std::fs::read(mask_path)?));
    }

    let content = provider.edit(&request).await?;
    if let Some(text) = &content.text {
        println!("Model says: {text}");
    }

    match content.decode_inline_image()? {
        Some((format, _)) => {
            let path = format!("edited.{}", format.extension());
            content.save_image(&path)?;
            println!("Edited image saved to {path}");
        }
        None => println!("Edited image available at {:?}", content.image_url),
    }

    Ok(())
}
