//! Users collection

use std::sync::Arc;

use super::{
    ids::IdAllocator,
    store::{decode, Collection, DocumentStore, Filter},
};
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    store: Arc<dyn DocumentStore>,
    ids: IdAllocator,
}

impl UsersRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ids: IdAllocator::new(store.clone()),
            store,
        }
    }

    pub async fn list(&self, filter: &Filter) -> AppResult<Vec<User>> {
        self.store
            .find(Collection::Users, filter)
            .await?
            .into_iter()
            .map(decode::<User>)
            .collect()
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let doc = self
            .store
            .find_by_id(Collection::Users, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;
        decode(doc)
    }

    pub async fn create(&self, data: CreateUser) -> AppResult<User> {
        self.ids
            .insert_with_next_id(Collection::Users, |id| User::from_create(id, data.clone()))
            .await
    }

    pub async fn update(&self, data: &UpdateUser) -> AppResult<bool> {
        let fields = serde_json::to_value(data)?;
        self.store.set_fields(Collection::Users, data.id, &fields).await
    }
}
