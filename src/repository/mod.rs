//! Repository layer over the document store

pub mod books;
pub mod ids;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod users;

use std::sync::Arc;

use crate::{
    config::{DatabaseConfig, StoreBackend},
    error::AppResult,
};

pub use store::{Collection, DocumentStore, Filter};

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn DocumentStore>,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            books: books::BooksRepository::new(store.clone()),
            users: users::UsersRepository::new(store.clone()),
            store,
        }
    }
}

/// Open the store selected by configuration
pub async fn connect(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Postgres => Ok(Arc::new(postgres::PgDocumentStore::connect(config).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data will not survive a restart");
            Ok(Arc::new(memory::MemoryDocumentStore::new()))
        }
    }
}
