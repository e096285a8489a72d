//! Book (catalog entry) model and its per-copy state

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::validation::rule_violation;

/// Publication details; all three fields travel together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Publication {
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub publisher: String,
    #[validate(length(min = 1))]
    pub edition: String,
}

/// Checkout state of a copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_checked"))]
pub struct Checked {
    pub available: bool,
    /// Borrower; present exactly when the copy is checked out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Reservation state of a copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_reserved"))]
pub struct Reservation {
    pub reserved: bool,
    /// Reserving user; present exactly when the copy is reserved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// One physical copy of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookCopy {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(nested)]
    pub checked: Checked,
    #[validate(nested)]
    pub reserved: Reservation,
}

fn has_user(user: &Option<String>) -> bool {
    user.as_deref().is_some_and(|u| !u.is_empty())
}

fn validate_checked(checked: &Checked) -> Result<(), ValidationError> {
    match (checked.available, has_user(&checked.user)) {
        (false, false) => Err(rule_violation(
            "checked_user_required",
            "user is required when available is false",
        )),
        (true, true) => Err(rule_violation(
            "checked_user_forbidden",
            "user must be empty when available is true",
        )),
        _ => Ok(()),
    }
}

fn validate_reserved(reserved: &Reservation) -> Result<(), ValidationError> {
    match (reserved.reserved, has_user(&reserved.user)) {
        (true, false) => Err(rule_violation(
            "reserved_user_required",
            "user is required when reserved is true",
        )),
        (false, true) => Err(rule_violation(
            "reserved_user_forbidden",
            "user must be empty when reserved is false",
        )),
        _ => Ok(()),
    }
}

/// Create book request; the server assigns `_id`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBook {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub genre: String,
    #[validate(length(min = 1))]
    pub imgurl: String,
    #[validate(nested)]
    pub publication: Publication,
    #[validate(nested)]
    pub copies: Vec<BookCopy>,
}

/// Update book request: `_id` selects the record, every other field present is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateBook {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub imgurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub publication: Option<Publication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub copies: Option<Vec<BookCopy>>,
}

/// Delete book request; any other fields in the body are ignored
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteBook {
    #[serde(rename = "_id")]
    pub id: i64,
}

/// Stored book document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub imgurl: String,
    pub publication: Publication,
    #[serde(default)]
    pub copies: Vec<BookCopy>,
}

impl Book {
    pub fn from_create(id: i64, data: CreateBook) -> Self {
        Self {
            id,
            title: data.title,
            author: data.author,
            genre: data.genre,
            imgurl: data.imgurl,
            publication: data.publication,
            copies: data.copies,
        }
    }

    pub fn copy_count(&self) -> usize {
        self.copies.len()
    }

    pub fn available_copy_count(&self) -> usize {
        self.copies.iter().filter(|c| c.checked.available).count()
    }
}

/// Book with the counts shown on its detail page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub copy_count: usize,
    pub available_copy_count: usize,
}

impl From<Book> for BookDetails {
    fn from(book: Book) -> Self {
        Self {
            copy_count: book.copy_count(),
            available_copy_count: book.available_copy_count(),
            book,
        }
    }
}
