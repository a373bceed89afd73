//! Core types for image editing.

use crate::error::{GenEditError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
    /// GIF format.
    Gif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Maps a MIME type such as `image/jpeg` to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        None
    }
}

/// Common aspect ratios, used as a prompt hint for simulated video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape (widescreen) aspect ratio.
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait (tall) aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3 standard landscape aspect ratio.
    #[serde(rename = "4:3")]
    Standard,
    /// 3:4 standard portrait aspect ratio.
    #[serde(rename = "3:4")]
    StandardPortrait,
    /// 21:9 ultrawide aspect ratio.
    #[serde(rename = "21:9")]
    Ultrawide,
}

impl AspectRatio {
    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::StandardPortrait => "3:4",
            Self::Ultrawide => "21:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = GenEditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "16:9" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Portrait),
            "4:3" => Ok(Self::Standard),
            "3:4" => Ok(Self::StandardPortrait),
            "21:9" => Ok(Self::Ultrawide),
            other => Err(GenEditError::Decode(format!("unknown aspect ratio: {other}"))),
        }
    }
}

/// An image attached to an edit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageInput {
    /// Base64 payload sent as an inline data reference.
    Inline {
        /// Base64-encoded image bytes.
        data: String,
        /// MIME type, e.g. `image/jpeg`.
        mime_type: String,
    },
    /// Absolute URL the API fetches itself.
    Url(String),
}

impl ImageInput {
    /// Creates an inline image from base64 data and its MIME type.
    pub fn inline(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Inline {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Creates a URL reference.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Encodes raw bytes, detecting the MIME type from magic bytes (PNG if unknown).
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_bytes_or(data, ImageFormat::default())
    }

    /// Encodes raw bytes, using `fallback` when the magic bytes are not recognized.
    pub fn from_bytes_or(data: &[u8], fallback: ImageFormat) -> Self {
        let format = ImageFormat::from_magic_bytes(data).unwrap_or(fallback);
        Self::inline(
            base64::engine::general_purpose::STANDARD.encode(data),
            format.mime_type(),
        )
    }

    /// Parses a `data:<mime>;base64,<payload>` string.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let (mime_type, data) = split_data_url(data_url)?;
        Ok(Self::inline(data, mime_type))
    }

    /// Returns the value placed in an `image_url.url` field.
    pub fn to_url(&self) -> String {
        match self {
            Self::Inline { data, mime_type } => format!("data:{mime_type};base64,{data}"),
            Self::Url(url) => url.clone(),
        }
    }
}

/// A mask marking the editable region. Always sent as PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskInput {
    data: String,
}

impl MaskInput {
    /// Creates a mask from base64 data. A full data URI is accepted too; its
    /// declared type is dropped.
    pub fn new(data: impl Into<String>) -> Self {
        let data = data.into();
        let payload = split_data_url(&data).ok().map(|(_, p)| p.to_string());
        Self {
            data: payload.unwrap_or(data),
        }
    }

    /// Encodes raw mask bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(data),
        }
    }

    /// Returns the base64 payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the PNG data URI sent to the API.
    pub fn to_url(&self) -> String {
        format!("data:image/png;base64,{}", self.data)
    }
}

/// A request to edit an image with a text instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    /// Free-text edit instruction.
    pub instruction: String,
    /// The image being edited.
    pub image: ImageInput,
    /// Optional mask restricting the edit.
    pub mask: Option<MaskInput>,
    /// Optional second image, e.g. a style or object reference.
    pub secondary_image: Option<ImageInput>,
}

impl EditRequest {
    /// Creates a new request for the given image and instruction.
    pub fn new(image: ImageInput, instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            image,
            mask: None,
            secondary_image: None,
        }
    }

    /// Restricts the edit to the masked area.
    pub fn with_mask(mut self, mask: MaskInput) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Attaches a secondary image.
    pub fn with_secondary_image(mut self, image: ImageInput) -> Self {
        self.secondary_image = Some(image);
        self
    }
}

/// Result of an edit or simulated video call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "generated content should be saved or displayed"]
pub struct GeneratedContent {
    /// Image URL or data URI extracted from the response.
    pub image_url: Option<String>,
    /// Text left after removing image references.
    pub text: Option<String>,
    /// Placeholder video reference (simulated video only).
    pub video_url: Option<String>,
}

impl GeneratedContent {
    /// Returns true if an image reference is present.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// Decodes an inline `data:image/...;base64,` reference.
    ///
    /// Returns `Ok(None)` for remote URLs or when no image is present.
    pub fn decode_inline_image(&self) -> Result<Option<(ImageFormat, Vec<u8>)>> {
        let Some(url) = self.image_url.as_deref() else {
            return Ok(None);
        };
        if !url.starts_with("data:") {
            return Ok(None);
        }

        let (mime_type, payload) = split_data_url(url)?;
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| GenEditError::Decode(e.to_string()))?;
        let format = ImageFormat::from_magic_bytes(&data)
            .or_else(|| ImageFormat::from_mime_type(mime_type))
            .unwrap_or_default();
        Ok(Some((format, data)))
    }

    /// Saves an inline image to the specified path.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<ImageFormat> {
        let (format, data) = self.decode_inline_image()?.ok_or_else(|| {
            GenEditError::Decode("content has no inline image to save".into())
        })?;
        std::fs::write(path, &data)?;
        Ok(format)
    }
}

/// Splits a base64 data URI into `(mime_type, payload)`.
pub(crate) fn split_data_url(data_url: &str) -> Result<(&str, &str)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| GenEditError::Decode("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GenEditError::Decode("data URL has no payload separator".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| GenEditError::Decode("data URL is not base64-encoded".into()))?;
    Ok((mime_type, payload))
}
