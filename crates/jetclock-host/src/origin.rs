//! Origin checks for privileged loader frames.

use tracing::warn;
use url::Url;

use crate::error::RelayError;

/// Serialized origin (`scheme://host[:port]`) of a URL, following the
/// WHATWG rules browsers use for `event.origin`: default ports are dropped,
/// hosts are lowercased and userinfo is ignored.
///
/// Returns `None` for unparsable URLs and for opaque origins (`about:blank`,
/// `data:` URLs, custom schemes).
pub fn origin_of(url: &str) -> Option<String> {
    let origin = Url::parse(url).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Accepts messages from exactly one origin.
#[derive(Debug, Clone)]
pub struct OriginGate {
    expected: String,
}

impl OriginGate {
    pub fn new(expected: &str) -> Self {
        let expected = origin_of(expected).unwrap_or_else(|| expected.trim_end_matches('/').to_string());
        Self { expected }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Reject anything not from the expected origin. The rejection is only
    /// logged; callers must not answer the sender.
    pub fn check(&self, origin: &str) -> Result<(), RelayError> {
        let normalized = origin_of(origin);
        if normalized.as_deref() == Some(self.expected.as_str()) {
            Ok(())
        } else {
            warn!(
                origin,
                expected = %self.expected,
                "message rejected: untrusted origin"
            );
            Err(RelayError::UntrustedOrigin(origin.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_strips_path_query_and_fragment() {
        assert_eq!(
            origin_of("https://app.jetclock.io/clock/abc?version=1#x").as_deref(),
            Some("https://app.jetclock.io")
        );
        assert_eq!(
            origin_of("http://localhost:3456/expose/t/").as_deref(),
            Some("http://localhost:3456")
        );
    }

    #[test]
    fn origin_lowercases_and_drops_userinfo() {
        assert_eq!(
            origin_of("HTTPS://user:pw@App.JetClock.io/").as_deref(),
            Some("https://app.jetclock.io")
        );
    }

    #[test]
    fn origin_drops_default_port() {
        assert_eq!(
            origin_of("https://app.jetclock.io:443/clock").as_deref(),
            Some("https://app.jetclock.io")
        );
        assert_eq!(
            origin_of("http://localhost:80/").as_deref(),
            Some("http://localhost")
        );
    }

    #[test]
    fn backslash_ends_the_authority() {
        assert_eq!(
            origin_of("https://evil.example\\@app.jetclock.io/").as_deref(),
            Some("https://evil.example")
        );
    }

    #[test]
    fn origin_of_non_hierarchical_urls_is_none() {
        assert!(origin_of("about:blank").is_none());
        assert!(origin_of("data:text/html,<h1>x</h1>").is_none());
        assert!(origin_of("").is_none());
        assert!(origin_of("https://").is_none());
        assert!(origin_of("null").is_none());
        assert!(origin_of("jetclock://localhost/index.html").is_none());
    }

    #[test]
    fn gate_accepts_expected_origin() {
        let gate = OriginGate::new("https://app.jetclock.io");
        assert!(gate.check("https://app.jetclock.io").is_ok());
        assert!(gate.check("https://app.jetclock.io/clock/1").is_ok());
    }

    #[test]
    fn gate_normalizes_expected_value() {
        let gate = OriginGate::new("https://app.jetclock.io/");
        assert_eq!(gate.expected(), "https://app.jetclock.io");
    }

    #[test]
    fn gate_accepts_explicit_default_port() {
        let gate = OriginGate::new("https://app.jetclock.io");
        assert!(gate.check("https://app.jetclock.io:443").is_ok());
    }

    #[test]
    fn gate_rejects_lookalike_authorities() {
        let gate = OriginGate::new("https://app.jetclock.io");
        for origin in [
            "https://evil.example\\@app.jetclock.io/",
            "https://evil.example\\.app.jetclock.io",
            "https://app.jetclock.io@evil.example",
        ] {
            assert!(gate.check(origin).is_err(), "{origin}");
        }
    }

    #[test]
    fn gate_rejects_other_origins() {
        let gate = OriginGate::new("https://app.jetclock.io");
        for origin in [
            "https://evil.example",
            "http://app.jetclock.io",
            "https://app.jetclock.io.evil.example",
            "https://app.jetclock.io:8443",
            "null",
            "",
        ] {
            let err = gate.check(origin).unwrap_err();
            assert!(matches!(err, RelayError::UntrustedOrigin(_)), "{origin}");
        }
    }
}
