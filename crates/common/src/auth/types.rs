//! Token types
//!
//! A token is either absent (never fetched) or has a definite expiry. Value and
//! expiry are always replaced together.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Result of one credential exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// Validity window counted from the moment the grant was received
    pub expires_in: Duration,
}

impl TokenGrant {
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self { access_token: access_token.into(), expires_in }
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Bearer token with its absolute expiry instant.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { value: value.into(), expires_at }
    }

    /// Anchor a grant's relative validity at `received_at`.
    ///
    /// Returns `None` when the validity window does not fit the calendar.
    pub fn from_grant(grant: TokenGrant, received_at: DateTime<Utc>) -> Option<Self> {
        let expires_at = chrono::Duration::from_std(grant.expires_in)
            .ok()
            .and_then(|validity| received_at.checked_add_signed(validity))?;
        Some(Self { value: grant.access_token, expires_at })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// `false` once `now` is within `margin` of the recorded expiry.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        chrono::Duration::from_std(margin)
            .ok()
            .and_then(|margin| self.expires_at.checked_sub_signed(margin))
            .is_some_and(|refresh_at| now < refresh_at)
    }

    /// Seconds until expiry; negative once expired.
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: Duration = Duration::from_secs(300);

    fn token_valid_for(secs: u64, now: DateTime<Utc>) -> AccessToken {
        AccessToken::from_grant(TokenGrant::new("t", Duration::from_secs(secs)), now).unwrap()
    }

    #[test]
    fn token_outside_margin_is_usable() {
        let now = Utc::now();
        let token = token_valid_for(3600, now);

        assert!(token.is_usable(now, MARGIN));
        assert_eq!(token.seconds_until_expiry(now), 3600);
    }

    #[test]
    fn token_inside_margin_is_not_usable() {
        let now = Utc::now();
        let token = token_valid_for(3600, now);

        let near_expiry = now + chrono::Duration::seconds(3600 - 299);
        assert!(!token.is_usable(near_expiry, MARGIN));

        let at_boundary = now + chrono::Duration::seconds(3600 - 300);
        assert!(!token.is_usable(at_boundary, MARGIN));
    }

    #[test]
    fn short_lived_grant_is_never_usable() {
        let now = Utc::now();
        let token = token_valid_for(60, now);

        assert!(!token.is_usable(now, MARGIN));
    }

    #[test]
    fn validity_beyond_calendar_is_rejected() {
        let now = Utc::now();

        let huge = TokenGrant::new("t", Duration::from_secs(9_000_000_000_000));
        assert!(AccessToken::from_grant(huge, now).is_none());

        let unrepresentable = TokenGrant::new("t", Duration::MAX);
        assert!(AccessToken::from_grant(unrepresentable, now).is_none());
    }

    #[test]
    fn debug_output_redacts_token() {
        let token = AccessToken::new("very-secret", Utc::now());
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
