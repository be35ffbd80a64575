//! Composite filter over the grant classification fields.

/// Filter over the immutable classification fields of a grant.
///
/// Each component is optional; an unset component matches everything. The
/// empty filter therefore matches every record - callers that must not mass
/// delete are expected to set at least one component, and the revocation
/// paths in the grant store always do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantFilter {
    /// Match records for this subject.
    pub subject_id: Option<String>,
    /// Match records owned by this client.
    pub client_id: Option<String>,
    /// Match records of this grant type.
    pub grant_type: Option<String>,
}

impl GrantFilter {
    /// Creates an empty filter matching every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to a subject.
    #[must_use]
    pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// Restricts the filter to a client.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Restricts the filter to a grant type.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    /// Returns `true` if no component is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject_id.is_none() && self.client_id.is_none() && self.grant_type.is_none()
    }

    /// Returns `true` if the record's classification fields satisfy every
    /// set component.
    #[must_use]
    pub fn matches(&self, record: &crate::GrantRecord) -> bool {
        if let Some(subject_id) = &self.subject_id
            && record.subject_id.as_deref() != Some(subject_id.as_str())
        {
            return false;
        }
        if let Some(client_id) = &self.client_id
            && record.client_id != *client_id
        {
            return false;
        }
        if let Some(grant_type) = &self.grant_type
            && record.grant_type != *grant_type
        {
            return false;
        }
        true
    }
}
