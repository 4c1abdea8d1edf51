use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque routing key for one plugin instance.
///
/// Issued by the native host when a plugin loads and never reused. The
/// relay treats it as an unstructured string; only emptiness is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginToken(String);

impl PluginToken {
    /// Mint a fresh, unguessable token.
    pub fn new() -> Self {
        Self(new_id())
    }

    /// Wrap an externally issued token. Returns `None` for an empty string.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PluginToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PluginToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn minted_tokens_are_unique() {
        let a = PluginToken::new();
        let b = PluginToken::new();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(PluginToken::parse("").is_none());
        assert_eq!(PluginToken::parse("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn token_display_is_raw_string() {
        let token = PluginToken::parse("tok-123").unwrap();
        assert_eq!(token.to_string(), "tok-123");
    }

    #[test]
    fn token_serializes_as_plain_string() {
        let token = PluginToken::parse("tok-123").unwrap();
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"tok-123\"");
        let back: PluginToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
