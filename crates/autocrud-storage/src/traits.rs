//! The storage contract.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::Record;

/// Storage of model records, one ordered partition per model name.
///
/// A partition that was never written reads as empty. Implementations must
/// serialize writes so that identifiers are never handed out twice and a
/// reader never observes a half-applied write.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the records of `model` in partition order.
    async fn list(&self, model: &str) -> Result<Vec<Record>, StorageError>;

    /// Returns the record of `model` with identifier `id`.
    async fn get(&self, model: &str, id: &str) -> Result<Option<Record>, StorageError>;

    /// Stores `input` under a newly allocated identifier and returns the
    /// stored record. Any `id` in `input` is ignored.
    async fn create(&self, model: &str, input: Record) -> Result<Record, StorageError>;

    /// Merges `patch` into the record with identifier `id`.
    ///
    /// Returns `None`, leaving the partition unchanged, if no such record exists.
    async fn update(
        &self,
        model: &str,
        id: &str,
        patch: Record,
    ) -> Result<Option<Record>, StorageError>;

    /// Removes the record with identifier `id`.
    ///
    /// Returns `false`, leaving the partition unchanged, if no such record exists.
    async fn delete(&self, model: &str, id: &str) -> Result<bool, StorageError>;

    /// Returns the number of records of `model`.
    async fn count(&self, model: &str) -> Result<usize, StorageError> {
        Ok(self.list(model).await?.len())
    }
}
