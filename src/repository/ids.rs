//! Sequential identifier allocation

use serde::Serialize;
use std::sync::Arc;

use super::store::{Collection, DocumentStore};
use crate::error::{AppError, AppResult};

/// Attempts before a persistent id collision is reported to the caller
pub const MAX_INSERT_ATTEMPTS: usize = 8;

/// Hands out `max(_id) + 1` per collection. Allocation and insert race with
/// other writers, so inserts go through [`IdAllocator::insert_with_next_id`],
/// which retries with a fresh id when the store reports the id as taken.
#[derive(Clone)]
pub struct IdAllocator {
    store: Arc<dyn DocumentStore>,
}

impl IdAllocator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Next identifier for `collection`: 1 when empty, otherwise max + 1
    pub async fn next_id(&self, collection: Collection) -> AppResult<i64> {
        Ok(self
            .store
            .max_id(collection)
            .await?
            .map_or(1, |max| max + 1))
    }

    /// Build a record for the next identifier and insert it
    pub async fn insert_with_next_id<T, F>(&self, collection: Collection, build: F) -> AppResult<T>
    where
        T: Serialize,
        F: Fn(i64) -> T,
    {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let id = self.next_id(collection).await?;
            let record = build(id);
            let doc = serde_json::to_value(&record)?;

            match self.store.insert(collection, id, &doc).await {
                Ok(()) => return Ok(record),
                Err(AppError::DuplicateKey(msg)) => {
                    tracing::warn!(
                        "Id {} in {} was taken concurrently (attempt {}/{}): {}",
                        id, collection, attempt, MAX_INSERT_ATTEMPTS, msg
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::DuplicateKey(format!(
            "could not allocate a free _id in {} after {} attempts",
            collection, MAX_INSERT_ATTEMPTS
        )))
    }
}
