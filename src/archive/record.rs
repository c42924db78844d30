use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted, immutable validation result visible to the whole team.
///
/// `id` and `created_at` are assigned by the store, never by the client;
/// client clocks would reorder records across contributors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub input: String,
    pub output: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
}

/// The caller-supplied fields of a record about to be written.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub record_type: String,
    pub input: String,
    pub output: String,
    pub author_id: String,
}

/// View order: `created_at` descending, ties broken by `id` descending.
/// The tie-break is not user-visible policy but must be stable so every
/// subscriber materializes the identical sequence.
pub fn view_order(a: &ArchiveRecord, b: &ArchiveRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}
