//! Library Catalog
//!
//! A REST JSON API and server-rendered pages for a library catalog: books
//! with per-copy availability and reservation state, and library users with
//! their borrow, reservation and late-fee history.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::{DocumentStore, Repository};
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire services over an already opened document store
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(Services::new(Repository::new(store))),
        }
    }
}
