//! User (patron) model with borrow, reservation and fee history

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::list_or_blank;

/// A copy currently on loan to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Borrowed {
    #[serde(rename = "bookID")]
    #[validate(length(min = 1))]
    pub book_id: String,
    #[serde(rename = "copyID")]
    #[validate(length(min = 1))]
    pub copy_id: String,
    #[validate(length(min = 1))]
    pub borrow_date: String,
    #[validate(length(min = 1))]
    pub due_date: String,
}

/// A copy the user has reserved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Reserved {
    #[serde(rename = "bookID")]
    #[validate(length(min = 1))]
    pub book_id: String,
    #[serde(rename = "copyID")]
    #[validate(length(min = 1))]
    pub copy_id: String,
    #[validate(length(min = 1))]
    pub due_date: String,
}

/// Late fee for an overdue copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Fee {
    #[serde(rename = "bookID")]
    #[validate(length(min = 1))]
    pub book_id: String,
    #[serde(rename = "copyID")]
    #[validate(length(min = 1))]
    pub copy_id: String,
    #[validate(length(min = 1))]
    pub due_date: String,
    #[validate(length(min = 1))]
    pub return_date: String,
    #[validate(length(min = 1))]
    pub fee: String,
}

/// Create user request; the server assigns `_id`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default, deserialize_with = "list_or_blank")]
    #[validate(nested)]
    pub borrowed: Option<Vec<Borrowed>>,
    #[serde(default, deserialize_with = "list_or_blank")]
    #[validate(nested)]
    pub reserved: Option<Vec<Reserved>>,
    #[serde(default, deserialize_with = "list_or_blank")]
    #[validate(nested)]
    pub fees: Option<Vec<Fee>>,
}

/// Update user request: `_id` selects the record, every other field present is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUser {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "list_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub borrowed: Option<Vec<Borrowed>>,
    #[serde(
        default,
        deserialize_with = "list_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub reserved: Option<Vec<Reserved>>,
    #[serde(
        default,
        deserialize_with = "list_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(nested)]
    pub fees: Option<Vec<Fee>>,
}

/// Stored user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed: Option<Vec<Borrowed>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<Vec<Reserved>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<Vec<Fee>>,
}

impl User {
    pub fn from_create(id: i64, data: CreateUser) -> Self {
        Self {
            id,
            name: data.name,
            email: data.email,
            borrowed: data.borrowed,
            reserved: data.reserved,
            fees: data.fees,
        }
    }

    /// Whether the user owes at least one late fee
    pub fn has_fees(&self) -> bool {
        self.fees.as_ref().is_some_and(|fees| !fees.is_empty())
    }
}
