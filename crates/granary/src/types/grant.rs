//! Persisted grant domain type.
//!
//! A grant is an already-minted OAuth/OIDC artifact: a refresh token, an
//! authorization code, a device code, or a consent record. The store never
//! interprets the protocol payload; it persists it verbatim under the
//! grant's natural key.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A persisted OAuth/OIDC grant.
///
/// Identified by [`key`](Self::key), which is globally unique across live
/// grants and immutable once stored. The classification fields
/// (`grant_type`, `subject_id`, `client_id`) exist for revocation-scoped
/// filtering only and never contribute to identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Natural unique identifier. Used as the idempotency key for storage.
    pub key: String,

    /// Category of grant; see the associated constants for well-known kinds.
    pub grant_type: String,

    /// End-user the grant belongs to. `None` for client-only grants such as
    /// client-credentials reference tokens.
    pub subject_id: Option<String>,

    /// Client application the grant was issued to.
    pub client_id: String,

    /// When the grant was created.
    pub creation_time: OffsetDateTime,

    /// Instant after which the grant is dead. `None` means non-expiring.
    ///
    /// An expired grant is eligible for the cleanup sweep but may still be
    /// returned by reads until a sweep runs; callers check
    /// [`is_expired`](Self::is_expired) rather than relying on absence.
    pub expiration: Option<OffsetDateTime>,

    /// Opaque serialized protocol state, stored and returned verbatim.
    pub data: String,
}

impl Grant {
    /// Refresh token grant type.
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
    /// Authorization code grant type.
    pub const AUTHORIZATION_CODE: &'static str = "authorization_code";
    /// Device flow code grant type.
    pub const DEVICE_CODE: &'static str = "device_code";
    /// User consent record grant type.
    pub const USER_CONSENT: &'static str = "user_consent";
    /// Reference access token grant type.
    pub const REFERENCE_TOKEN: &'static str = "reference_token";

    /// Returns `true` if this grant's expiration has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expiration
            .map(|exp| OffsetDateTime::now_utc() > exp)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn grant(expiration: Option<OffsetDateTime>) -> Grant {
        Grant {
            key: "key-1".to_string(),
            grant_type: Grant::REFRESH_TOKEN.to_string(),
            subject_id: Some("subject-1".to_string()),
            client_id: "client-1".to_string(),
            creation_time: OffsetDateTime::now_utc(),
            expiration,
            data: "{}".to_string(),
        }
    }

    #[test]
    fn test_is_expired() {
        let now = OffsetDateTime::now_utc();

        assert!(grant(Some(now - Duration::hours(1))).is_expired());
        assert!(!grant(Some(now + Duration::hours(1))).is_expired());
        assert!(!grant(None).is_expired());
    }
}
