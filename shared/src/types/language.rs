//! Language selection for client-facing messages

use serde::{Deserialize, Serialize};

/// Language of the default message placed in a response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "zh")]
    #[default]
    Chinese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Pick a language from an `Accept-Language` header value
    ///
    /// The entry with the highest quality wins; only `zh*` and `en*` are
    /// recognized. Anything else falls back to Chinese.
    pub fn from_accept_language(header: &str) -> Self {
        let mut preferred = Language::default();
        let mut best_quality = -1.0_f32;

        for entry in header.split(',') {
            let mut parts = entry.trim().split(';');
            let tag = parts.next().unwrap_or_default().trim().to_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let language = if tag.starts_with("zh") {
                Language::Chinese
            } else if tag.starts_with("en") {
                Language::English
            } else {
                continue;
            };

            if quality > best_quality {
                preferred = language;
                best_quality = quality;
            }
        }

        preferred
    }

    /// Language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
