//! In-process document store

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::store::{Collection, DocumentStore, Filter};
use crate::error::{AppError, AppResult};

/// Document store kept in memory, with the same matching and key rules as
/// the PostgreSQL store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, BTreeMap<i64, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.values().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: Collection, id: i64) -> AppResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn max_id(&self, collection: Collection) -> AppResult<Option<i64>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.keys().next_back().copied()))
    }

    async fn insert(&self, collection: Collection, id: i64, doc: &Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.contains_key(&id) {
            return Err(AppError::DuplicateKey(format!(
                "{} already contains _id {}",
                collection, id
            )));
        }
        docs.insert(id, doc.clone());
        Ok(())
    }

    async fn set_fields(&self, collection: Collection, id: i64, fields: &Value) -> AppResult<bool> {
        let Value::Object(fields) = fields else {
            return Err(AppError::Internal("set_fields expects an object".to_string()));
        };

        let mut collections = self.collections.write().await;
        match collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&id))
        {
            Some(Value::Object(doc)) => {
                for (k, v) in fields {
                    doc.insert(k.clone(), v.clone());
                }
                Ok(true)
            }
            Some(_) => Err(AppError::Internal(format!(
                "{} document {} is not an object",
                collection, id
            ))),
            None => Ok(false),
        }
    }

    async fn remove(&self, collection: Collection, id: i64) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(&id))
            .is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {
        self.collections.write().await.clear();
    }
}
