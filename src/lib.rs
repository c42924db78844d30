//! Brand-governance workstation core for PROPER MARKET.
//!
//! Operators submit candidate marketing copy or product ideas, the system
//! evaluates them against the fixed brand book via a generative completion
//! service, lets the operator role-play target customer personas, and
//! persists accepted evaluations into a shared team archive with a live,
//! ordered view.

pub mod archive;
pub mod brand;
pub mod completion;
pub mod config;
pub mod errors;
pub mod features;
pub mod lifecycle;
pub mod session;

pub use archive::{ArchiveRecord, ArchiveStore, ArchiveSubscription, ArchiveWriter, MemoryStore};
pub use brand::{BRAND_BOOK, Persona};
pub use completion::{CompletionBackend, CompletionClient};
pub use config::GuardianConfig;
pub use errors::ArchiveError;
pub use features::{CopyValidator, PersonaSimulator};
pub use lifecycle::{AnalysisOutcome, AnalysisRequest, AnalysisStatus, RequestKind, RequestLifecycle};
pub use session::{Identity, IdentityProvider, SessionManager};

/// Install the process-wide tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_telemetry() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
