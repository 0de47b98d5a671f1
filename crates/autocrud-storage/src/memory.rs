//! In-memory record store.
//!
//! All partitions live behind one `tokio::sync::RwLock`. Reads share the
//! lock; every write holds it exclusively for the whole allocate-and-apply
//! step, so concurrent creates never receive the same identifier and a
//! reader never sees a partially replaced partition.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::StorageError;
use crate::record::{ID_FIELD, Record, merge_records};
use crate::traits::RecordStore;

/// Scope of the identifier counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScope {
    /// One counter per partition: the first record of every model is `"0"`.
    #[default]
    Partition,
    /// One counter shared by every partition.
    Global,
}

/// Records of one model, in insertion order, keyed by identifier.
#[derive(Debug, Default)]
struct Partition {
    records: IndexMap<String, Record>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    partitions: HashMap<String, Partition>,
    next_id: u64,
}

impl StoreState {
    fn allocate_id(&mut self, model: &str, scope: IdScope) -> String {
        let counter = match scope {
            IdScope::Global => &mut self.next_id,
            IdScope::Partition => &mut self.partitions.entry(model.to_string()).or_default().next_id,
        };
        let id = *counter;
        *counter += 1;
        id.to_string()
    }
}

/// Process-lifetime record store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    id_scope: IdScope,
}

impl InMemoryStore {
    /// Creates an empty store with per-partition identifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given identifier scope.
    #[must_use]
    pub fn with_id_scope(id_scope: IdScope) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            id_scope,
        }
    }

    /// Returns the identifier scope.
    #[must_use]
    pub fn id_scope(&self) -> IdScope {
        self.id_scope
    }

    /// Names of the partitions written so far.
    pub async fn partition_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut names: Vec<String> = state.partitions.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list(&self, model: &str) -> Result<Vec<Record>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .partitions
            .get(model)
            .map(|p| p.records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, model: &str, id: &str) -> Result<Option<Record>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .partitions
            .get(model)
            .and_then(|p| p.records.get(id))
            .cloned())
    }

    async fn create(&self, model: &str, input: Record) -> Result<Record, StorageError> {
        let mut state = self.state.write().await;
        let id = state.allocate_id(model, self.id_scope);

        let mut record = Record::new();
        record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        record.extend(input.into_iter().filter(|(key, _)| key != ID_FIELD));

        state
            .partitions
            .entry(model.to_string())
            .or_default()
            .records
            .insert(id.clone(), record.clone());

        debug!(model = %model, id = %id, "Record created");
        Ok(record)
    }

    async fn update(
        &self,
        model: &str,
        id: &str,
        patch: Record,
    ) -> Result<Option<Record>, StorageError> {
        let mut state = self.state.write().await;
        let Some(existing) = state
            .partitions
            .get_mut(model)
            .and_then(|p| p.records.get_mut(id))
        else {
            trace!(model = %model, id = %id, "Update target not found");
            return Ok(None);
        };

        let merged = merge_records(existing, &patch);
        *existing = merged.clone();

        debug!(model = %model, id = %id, "Record updated");
        Ok(Some(merged))
    }

    async fn delete(&self, model: &str, id: &str) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        let removed = state
            .partitions
            .get_mut(model)
            .and_then(|p| p.records.shift_remove(id))
            .is_some();

        if removed {
            debug!(model = %model, id = %id, "Record deleted");
        } else {
            trace!(model = %model, id = %id, "Delete target not found");
        }
        Ok(removed)
    }

    async fn count(&self, model: &str) -> Result<usize, StorageError> {
        let state = self.state.read().await;
        Ok(state.partitions.get(model).map_or(0, |p| p.records.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::record::record_from_json;

    fn rec(value: Value) -> Record {
        record_from_json(value).unwrap()
    }

    #[tokio::test]
    async fn test_list_absent_partition_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.list("User").await.unwrap().is_empty());
        assert_eq!(store.count("User").await.unwrap(), 0);
        assert!(store.partition_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let ann = store.create("User", rec(json!({"name": "Ann"}))).await.unwrap();
        let bob = store.create("User", rec(json!({"name": "Bob"}))).await.unwrap();

        assert_eq!(Value::Object(ann), json!({"id": "0", "name": "Ann"}));
        assert_eq!(Value::Object(bob), json!({"id": "1", "name": "Bob"}));
        assert_eq!(store.partition_names().await, ["User"]);
    }

    #[tokio::test]
    async fn test_partition_scope_counts_per_model() {
        let store = InMemoryStore::new();
        let user = store.create("User", rec(json!({"name": "Ann"}))).await.unwrap();
        let post = store.create("Post", rec(json!({"title": "Hi"}))).await.unwrap();
        assert_eq!(user["id"], "0");
        assert_eq!(post["id"], "0");
    }

    #[tokio::test]
    async fn test_global_scope_shares_counter() {
        let store = InMemoryStore::with_id_scope(IdScope::Global);
        assert_eq!(store.id_scope(), IdScope::Global);
        let user = store.create("User", rec(json!({}))).await.unwrap();
        let post = store.create("Post", rec(json!({}))).await.unwrap();
        assert_eq!(user["id"], "0");
        assert_eq!(post["id"], "1");
    }

    #[tokio::test]
    async fn test_create_ignores_payload_id() {
        let store = InMemoryStore::new();
        let created = store
            .create("User", rec(json!({"id": "42", "name": "Ann"})))
            .await
            .unwrap();
        assert_eq!(created["id"], "0");
        assert!(store.get("User", "42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryStore::new();
        store.create("User", rec(json!({}))).await.unwrap();
        store.create("User", rec(json!({}))).await.unwrap();
        assert!(store.delete("User", "1").await.unwrap());
        let next = store.create("User", rec(json!({}))).await.unwrap();
        assert_eq!(next["id"], "2");
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_others() {
        let store = InMemoryStore::new();
        store.create("Post", rec(json!({"title": "A", "views": 1}))).await.unwrap();
        store.create("Post", rec(json!({"title": "B", "views": 2}))).await.unwrap();
        let before = store.list("Post").await.unwrap();

        let updated = store
            .update("Post", "1", rec(json!({"views": 5})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(updated), json!({"id": "1", "title": "B", "views": 5}));

        let after = store.list("Post").await.unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1]["views"], 5);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = InMemoryStore::new();
        store.create("Post", rec(json!({"title": "A"}))).await.unwrap();
        let before = store.list("Post").await.unwrap();

        assert!(store.update("Post", "9", rec(json!({"title": "X"}))).await.unwrap().is_none());
        assert!(store.update("Ghost", "0", rec(json!({}))).await.unwrap().is_none());
        assert_eq!(store.list("Post").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = InMemoryStore::new();
        for title in ["A", "B", "C"] {
            store.create("Post", rec(json!({"title": title}))).await.unwrap();
        }

        assert!(store.delete("Post", "1").await.unwrap());
        let titles: Vec<Value> = store
            .list("Post")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r["title"].clone())
            .collect();
        assert_eq!(titles, [json!("A"), json!("C")]);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = InMemoryStore::new();
        store.create("Post", rec(json!({"title": "A"}))).await.unwrap();
        assert!(!store.delete("Post", "5").await.unwrap());
        assert!(!store.delete("Ghost", "0").await.unwrap());
        assert_eq!(store.count("Post").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create("User", rec(json!({"n": i}))).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            ids.insert(record["id"].as_str().unwrap().to_string());
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(store.count("User").await.unwrap(), 32);
    }
}
