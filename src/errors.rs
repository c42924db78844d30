//! Typed errors surfaced to the operator.
//!
//! Only archive writes produce blocking errors. Sign-in failures degrade to
//! a demo identity, completion failures resolve to an absent result, and
//! subscription failures freeze the last-known view. None of those are
//! represented here because none of them propagate to callers.

use thiserror::Error;

/// Errors from persisting a validation result into the team archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No identity is available; the record could not be attributed to an
    /// author. Sign-in may still be in progress or permanently degraded.
    #[error("Not signed in; cannot attribute the record to an author")]
    Unauthenticated,

    /// The surface holds no successful analysis result to persist.
    #[error("No successful analysis result to save")]
    NoResult,

    /// The store rejected or failed the write. The cause is preserved for
    /// diagnostics; the operator may manually resubmit the save.
    #[error("Archive write failed: {0}")]
    StoreFailure(#[source] anyhow::Error),
}
