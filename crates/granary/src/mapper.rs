//! Mapping between the public [`Grant`] model and the storage
//! [`GrantRecord`].
//!
//! The two shapes carry the same fields; the record is the document form
//! backends persist. Each copy below lists every field explicitly so the
//! mapping stays total and auditable - adding a field to either shape is a
//! compile error here until the copy is extended.

use granary_storage::{GrantRecord, StoredGrant};

use crate::types::Grant;

/// Maps a public grant onto its storage record.
#[must_use]
pub fn to_record(grant: &Grant) -> GrantRecord {
    GrantRecord {
        key: grant.key.clone(),
        grant_type: grant.grant_type.clone(),
        subject_id: grant.subject_id.clone(),
        client_id: grant.client_id.clone(),
        creation_time: grant.creation_time,
        expiration: grant.expiration,
        data: grant.data.clone(),
    }
}

/// Maps a storage record back to the public model. The storage-internal
/// surrogate id is dropped; the public model identifies grants by key.
#[must_use]
pub fn to_model(record: GrantRecord) -> Grant {
    Grant {
        key: record.key,
        grant_type: record.grant_type,
        subject_id: record.subject_id,
        client_id: record.client_id,
        creation_time: record.creation_time,
        expiration: record.expiration,
        data: record.data,
    }
}

/// Maps a batch of stored grants back to public models.
#[must_use]
pub fn to_models(stored: Vec<StoredGrant>) -> Vec<Grant> {
    stored.into_iter().map(|s| to_model(s.record)).collect()
}
