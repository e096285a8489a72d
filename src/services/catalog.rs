//! Catalog (books) service

use crate::{
    error::AppResult,
    models::book::{Book, BookDetails, CreateBook, UpdateBook},
    repository::{Filter, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self, filter: &Filter) -> AppResult<Vec<Book>> {
        let books = self.repository.books.list(filter).await?;
        tracing::debug!("Listed {} books (filter: {})", books.len(), filter.to_value());
        Ok(books)
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Get a book with its copy counts for the detail page
    pub async fn get_book_details(&self, id: i64) -> AppResult<BookDetails> {
        self.get_book(id).await.map(BookDetails::from)
    }

    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        let book = self.repository.books.create(data).await?;
        tracing::info!("Created book id={} \"{}\"", book.id, book.title);
        Ok(book)
    }

    /// Set the submitted fields and echo the payload back.
    /// An unknown id leaves the store untouched.
    pub async fn update_book(&self, data: UpdateBook) -> AppResult<UpdateBook> {
        if self.repository.books.update(&data).await? {
            tracing::info!("Updated book id={}", data.id);
        } else {
            tracing::debug!("Update for unknown book id={} matched nothing", data.id);
        }
        Ok(data)
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        if self.repository.books.delete(id).await? {
            tracing::info!("Deleted book id={}", id);
        } else {
            tracing::debug!("Delete for unknown book id={} matched nothing", id);
        }
        Ok(())
    }
}
