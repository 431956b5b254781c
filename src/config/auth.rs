//! Saved session record

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Clock skew tolerance for token expiry checks (in seconds)
pub const CLOCK_SKEW_TOLERANCE: i64 = 60;

/// Session persisted after a successful login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Token sent as `x-auth-token`
    #[serde(default)]
    pub token: String,

    /// Account the token belongs to
    #[serde(default)]
    pub email: String,

    /// Server the token was issued by
    #[serde(default)]
    pub base_url: String,

    /// Token expiration timestamp (Unix seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    /// Check if authentication is configured
    ///
    /// # Returns
    ///
    /// `true` if a token is set, `false` otherwise
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Check if token is expired, allowing for clock skew
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(is_token_expired)
    }
}

/// Current Unix time in seconds
#[must_use]
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| i64::try_from(dur.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Token is expired if: now > (exp + clock skew)
#[must_use]
pub fn is_token_expired(expires_at: i64) -> bool {
    now_secs() > expires_at.saturating_add(CLOCK_SKEW_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated() {
        let session = Session {
            token: "abc123".to_string(),
            ..Default::default()
        };
        assert!(session.is_authenticated());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_not_authenticated() {
        let session = Session::default();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_expiry_respects_clock_skew() {
        let now = now_secs();
        assert!(is_token_expired(now - 3600));
        assert!(!is_token_expired(now + 3600));
        assert!(!is_token_expired(now - 30));
        assert!(is_token_expired(now - 90));
    }
}
