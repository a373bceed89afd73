//! User-facing message catalog.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language used for messages surfaced to end users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zh,
}

/// Localized strings for one [`Locale`].
#[derive(Debug)]
pub struct Messages {
    /// Vendor quota exhausted.
    pub rate_limited: &'static str,
    /// Vendor reported an internal or unknown failure.
    pub server_unavailable: &'static str,
    /// Error without any usable description.
    pub unknown_error: &'static str,
    /// Response parsed but carried neither image nor explanation.
    pub no_image: &'static str,
    /// Response had no choices or no message content.
    pub malformed_response: &'static str,
    /// Prefix for failures of the simulated video path.
    pub video_failed: &'static str,
    /// Appended to the text of every simulated video result.
    pub video_disclaimer: &'static str,
}

static EN: Messages = Messages {
    rate_limited: "Too many requests: the API quota has been exhausted. Please try again later.",
    server_unavailable: "The image service hit a temporary error. Please try again in a moment.",
    unknown_error: "An unknown error occurred while communicating with the API.",
    no_image: "The model did not return an image. Try rephrasing the instruction.",
    malformed_response: "The API returned an unexpected response.",
    video_failed: "Video generation failed",
    video_disclaimer: "Note: video generation is simulated. The result is a still image generated from your prompt.",
};

static ZH: Messages = Messages {
    rate_limited: "请求过于频繁：API 配额已用尽，请稍后再试。",
    server_unavailable: "图像服务暂时出现错误，请稍后重试。",
    unknown_error: "与 API 通信时发生未知错误。",
    no_image: "模型未返回图片，请尝试修改指令。",
    malformed_response: "API 返回了无法识别的响应。",
    video_failed: "视频生成失败",
    video_disclaimer: "提示：视频生成为模拟功能，结果为根据提示词生成的静态图片。",
};

impl Locale {
    /// Returns the message catalog for this locale.
    pub fn messages(&self) -> &'static Messages {
        match self {
            Self::En => &EN,
            Self::Zh => &ZH,
        }
    }

    /// Returns the short language tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase().replace('_', "-");
        match tag.split('-').next().unwrap_or_default() {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            _ => Err(format!("unsupported locale: {s}")),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("EN-us".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("zh_CN".parse::<Locale>(), Ok(Locale::Zh));
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::Zh));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_catalogs_differ() {
        assert_ne!(
            Locale::En.messages().rate_limited,
            Locale::Zh.messages().rate_limited
        );
        assert_eq!(Locale::default(), Locale::En);
    }
}
