use std::sync::Arc;

use crate::errors::ArchiveError;
use crate::lifecycle::{AnalysisOutcome, AnalysisStatus};
use crate::session::Identity;

use super::record::{ArchiveRecord, NewRecord};
use super::store::ArchiveStore;

/// Persists one accepted validation result into the team archive.
///
/// Records are write-once: there is no update or delete path, and repeated
/// manual saves of the same outcome intentionally produce distinct records.
pub struct ArchiveWriter {
    store: Arc<dyn ArchiveStore>,
    namespace: String,
}

impl ArchiveWriter {
    pub fn new(store: Arc<dyn ArchiveStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Save a successful outcome as a new record.
    ///
    /// Preconditions are checked before any store access: an identity must
    /// exist and the outcome must be `Succeeded`. Store failures keep the
    /// underlying cause for diagnostics; no retry is attempted here.
    pub async fn save(
        &self,
        record_type: &str,
        input: &str,
        outcome: &AnalysisOutcome,
        identity: Option<&Identity>,
    ) -> Result<ArchiveRecord, ArchiveError> {
        let identity = identity.ok_or(ArchiveError::Unauthenticated)?;
        let output = match (&outcome.status, &outcome.text) {
            (AnalysisStatus::Succeeded, Some(text)) => text.clone(),
            _ => return Err(ArchiveError::NoResult),
        };

        let record = NewRecord {
            record_type: record_type.to_string(),
            input: input.to_string(),
            output,
            author_id: identity.id.clone(),
        };
        self.store
            .add_record(&self.namespace, record)
            .await
            .map_err(ArchiveError::StoreFailure)
    }
}
