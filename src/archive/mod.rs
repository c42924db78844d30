//! Write-once team archive: record schema, the store seam, the
//! precondition-checked writer, and the live ordered subscription.

mod record;
mod store;
mod subscription;
mod writer;

pub use record::{ArchiveRecord, NewRecord, view_order};
pub use store::{ArchiveStore, MemoryStore};
pub use subscription::ArchiveSubscription;
pub use writer::ArchiveWriter;
