//! Books collection

use std::sync::Arc;

use super::{
    ids::IdAllocator,
    store::{decode, Collection, DocumentStore, Filter},
};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    store: Arc<dyn DocumentStore>,
    ids: IdAllocator,
}

impl BooksRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ids: IdAllocator::new(store.clone()),
            store,
        }
    }

    /// Books matching the filter, ordered by id
    pub async fn list(&self, filter: &Filter) -> AppResult<Vec<Book>> {
        self.store
            .find(Collection::Books, filter)
            .await?
            .into_iter()
            .map(decode::<Book>)
            .collect()
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        let doc = self
            .store
            .find_by_id(Collection::Books, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        decode(doc)
    }

    /// Insert a new book under the next free id
    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        self.ids
            .insert_with_next_id(Collection::Books, |id| Book::from_create(id, data.clone()))
            .await
    }

    /// Set the fields present in `data`; `false` when the id does not exist
    pub async fn update(&self, data: &UpdateBook) -> AppResult<bool> {
        let fields = serde_json::to_value(data)?;
        self.store.set_fields(Collection::Books, data.id, &fields).await
    }

    /// Delete book; `false` when the id does not exist
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        self.store.remove(Collection::Books, id).await
    }
}
