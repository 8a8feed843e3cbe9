use std::collections::HashMap;
use thiserror::Error;

/// The set of API keys authorized to call the shorten endpoint, mapping
/// each key to the user it identifies.
#[derive(Debug, Clone, Default)]
pub struct ApiKeySet {
    keys: HashMap<String, String>,
}

#[derive(Debug, Error)]
#[error("invalid api key entry '{0}', expected key=user")]
pub struct InvalidApiKeys(String);

impl ApiKeySet {
    /// Parses a comma-separated `key=user` list, e.g. `"key1=user1,key2=user2"`.
    pub fn parse(raw: &str) -> Result<Self, InvalidApiKeys> {
        let mut keys = HashMap::new();

        for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
            let (key, user) = entry
                .trim()
                .split_once('=')
                .ok_or_else(|| InvalidApiKeys(entry.trim().to_string()))?;
            if key.is_empty() || user.is_empty() {
                return Err(InvalidApiKeys(entry.trim().to_string()));
            }
            keys.insert(key.to_string(), user.to_string());
        }

        Ok(Self { keys })
    }

    /// Returns the user the key identifies, or `None` for an unknown key.
    pub fn authorize(&self, api_key: &str) -> Option<&str> {
        self.keys.get(api_key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
