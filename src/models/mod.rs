//! Data models for the catalog

pub mod book;
pub mod user;
pub mod validation;

// Re-export commonly used types
pub use book::{Book, BookCopy, BookDetails, CreateBook, DeleteBook, UpdateBook};
pub use user::{CreateUser, UpdateUser, User};
pub use validation::validate_payload;
