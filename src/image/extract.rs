//! Image reference extraction from free-text model responses.

use regex::Regex;
use std::sync::LazyLock;

/// Markdown image, bare image URL, or base64 image data URI.
///
/// Group 1 holds the target of a markdown image; the whole match is the
/// reference for the two bare forms.
static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"!\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#,
        r"|https?://[^\s)\]]+\.(?i:png|jpe?g|gif|webp|bmp)(?:\?[^\s)\]]*)?(?:\b|$)",
        r"|data:image/[a-zA-Z0-9.+-]+;base64,[A-Za-z0-9+/]+=*",
    ))
    .expect("image reference pattern is valid")
});

/// Image reference and residual text parsed from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// First image reference in scan order.
    pub image_url: Option<String>,
    /// Trimmed text with every image reference removed; `None` when empty.
    pub text: Option<String>,
}

/// Returns every image reference in left-to-right order.
pub fn image_references(content: &str) -> Vec<String> {
    IMAGE_REFERENCE
        .captures_iter(content)
        .map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Removes all image references and trims the result.
pub fn residual_text(content: &str) -> Option<String> {
    let stripped = IMAGE_REFERENCE.replace_all(content, "");
    let trimmed = stripped.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Splits a response into its first image reference and residual text.
///
/// Later references are discarded from the result but still removed from
/// the text.
pub fn extract(content: &str) -> ExtractedContent {
    ExtractedContent {
        image_url: image_references(content).into_iter().next(),
        text: residual_text(content),
    }
}
