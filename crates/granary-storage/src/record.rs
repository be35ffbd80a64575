//! Grant storage representation.
//!
//! [`GrantRecord`] is the document shape backends persist; [`StoredGrant`]
//! wraps it together with the storage-internal surrogate id the backend
//! assigns on first insert. The surrogate id never leaves the storage layer;
//! the public model identifies grants by their natural key only.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Grant record as persisted by a storage backend.
///
/// The record is serialized as a camelCase document, which is the on-disk
/// form for document-oriented backends (e.g. a JSONB column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRecord {
    /// Natural unique identifier of the grant. Immutable once stored and
    /// used as the upsert key.
    pub key: String,

    /// Category of grant (refresh token, authorization code, ...).
    #[serde(rename = "type")]
    pub grant_type: String,

    /// End-user the grant belongs to (None for client-only grants).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    /// Client application that owns the grant.
    pub client_id: String,

    /// When the grant was created.
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,

    /// Instant after which the grant is dead (None = non-expiring).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub expiration: Option<OffsetDateTime>,

    /// Opaque serialized protocol state. Stored and returned verbatim,
    /// never inspected by the storage layer.
    pub data: String,
}

impl GrantRecord {
    /// Returns `true` if the record's expiration is set and earlier than
    /// `now`. Such records are eligible for the cleanup sweep but may still
    /// be observed by readers until a sweep runs.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expiration.map(|exp| exp < now).unwrap_or(false)
    }
}

/// A grant record together with its storage-internal identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGrant {
    /// Surrogate identifier assigned by the backend on first insert.
    /// Stable for the record's lifetime, preserved across upserts.
    pub id: Uuid,

    /// The persisted record.
    pub record: GrantRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn record(expiration: Option<OffsetDateTime>) -> GrantRecord {
        GrantRecord {
            key: "key-1".to_string(),
            grant_type: "refresh_token".to_string(),
            subject_id: Some("subject-1".to_string()),
            client_id: "client-1".to_string(),
            creation_time: OffsetDateTime::now_utc(),
            expiration,
            data: "{}".to_string(),
        }
    }

    #[test]
    fn test_expiry_check() {
        let now = OffsetDateTime::now_utc();

        assert!(record(Some(now - Duration::days(1))).is_expired_at(now));
        assert!(!record(Some(now + Duration::days(1))).is_expired_at(now));
        // Non-expiring grants are never expired.
        assert!(!record(None).is_expired_at(now));
    }

    #[test]
    fn test_document_shape() {
        let now = OffsetDateTime::now_utc();
        let doc = serde_json::to_value(record(Some(now))).unwrap();

        assert!(doc.get("key").is_some());
        assert!(doc.get("type").is_some());
        assert!(doc.get("subjectId").is_some());
        assert!(doc.get("clientId").is_some());
        assert!(doc.get("creationTime").is_some());
        assert!(doc.get("expiration").is_some());
        assert!(doc.get("data").is_some());

        // Absent optionals are omitted from the document entirely.
        let mut rec = record(None);
        rec.subject_id = None;
        let doc = serde_json::to_value(rec).unwrap();
        assert!(doc.get("subjectId").is_none());
        assert!(doc.get("expiration").is_none());
    }

    #[test]
    fn test_document_round_trip() {
        let rec = record(Some(OffsetDateTime::now_utc()));
        let doc = serde_json::to_value(&rec).unwrap();
        let back: GrantRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(back, rec);
    }
}
