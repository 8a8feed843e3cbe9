use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const LENGTH: usize = 8;

/// The 8-character lowercase-hex identifier embedded in a short URL.
///
/// Codes are derived from the MD5 digest of the original URL's bytes, so
/// deriving the same URL twice — in any process, at any time — yields the
/// same code. Two distinct URLs whose digests share the first 8 hex
/// characters receive the same code; that collision is accepted and no
/// detection is performed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode(String);

impl ShortCode {
    /// Derives the code for an original URL.
    ///
    /// Any string is accepted, including the empty string; the input is
    /// treated as an opaque byte sequence.
    pub fn derive(original_url: &str) -> Self {
        let digest = md5::compute(original_url.as_bytes());
        let hex = format!("{:x}", digest);
        Self(hex[..LENGTH].to_string())
    }

    /// Parses an externally supplied code after validating it.
    ///
    /// Valid codes are exactly 8 lowercase hex characters.
    pub fn parse(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();

        if code.len() != LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be {}, got {}",
                LENGTH,
                code.len()
            )));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only lowercase hex characters: '{}'",
                code
            )));
        }

        Ok(Self(code))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
