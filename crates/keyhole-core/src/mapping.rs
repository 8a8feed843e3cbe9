use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored original-URL → short-URL mapping.
///
/// The original URL is an opaque byte sequence; no normalization is applied,
/// so two inputs differing only in case or trailing slash are distinct
/// mappings. A mapping is created once, on first resolution, and never
/// updated or deleted. The storage layer's surrogate key is not part of the
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// The long-form URL supplied by a caller.
    pub original_url: String,
    /// The derived alias URL returned to callers.
    pub short_url: String,
    /// When the mapping was first created.
    pub created_at: Timestamp,
}

impl UrlMapping {
    /// Builds the mapping for an original URL: derives the code, renders the
    /// short URL under `base_url`, and stamps the creation time.
    pub fn derive(original_url: impl Into<String>, base_url: &str) -> Self {
        let original_url = original_url.into();
        let short_url = ShortCode::derive(&original_url).to_url(base_url);
        Self {
            original_url,
            short_url,
            created_at: Timestamp::now(),
        }
    }
}
