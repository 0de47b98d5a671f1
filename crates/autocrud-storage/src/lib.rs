//! # autocrud-storage
//!
//! Record storage for Autocrud.
//!
//! The [`RecordStore`] trait is the contract every backend implements; the
//! resolvers only ever talk to a [`DynRecordStore`]. [`InMemoryStore`] is the
//! process-lifetime backend: one ordered partition of records per model,
//! keyed by the reserved `id` field.
//!
//! ## Example
//!
//! ```ignore
//! use autocrud_storage::{InMemoryStore, RecordStore};
//!
//! let store = InMemoryStore::new();
//! let user = store.create("User", record(json!({"name": "Ann"}))).await?;
//! assert_eq!(user["id"], "0");
//! ```

mod error;
pub mod memory;
pub mod record;
mod traits;

pub use error::StorageError;
pub use memory::{IdScope, InMemoryStore};
pub use record::{ID_FIELD, Record, id_value, merge_records, record_from_json, record_id};
pub use traits::RecordStore;

/// Type alias for a shareable store instance.
pub type DynRecordStore = std::sync::Arc<dyn RecordStore>;

/// Creates a new in-memory store with per-partition identifiers.
pub fn create_store() -> DynRecordStore {
    std::sync::Arc::new(InMemoryStore::new())
}
