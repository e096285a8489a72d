//! User (patron) service

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User},
    repository::{Filter, Repository},
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_users(&self, filter: &Filter) -> AppResult<Vec<User>> {
        self.repository.users.list(filter).await
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        let user = self.repository.users.create(data).await?;
        tracing::info!("Created user id={}", user.id);
        Ok(user)
    }

    /// Set the submitted fields and echo the payload back.
    /// An unknown id leaves the store untouched.
    pub async fn update_user(&self, data: UpdateUser) -> AppResult<UpdateUser> {
        if self.repository.users.update(&data).await? {
            tracing::info!("Updated user id={}", data.id);
        } else {
            tracing::debug!("Update for unknown user id={} matched nothing", data.id);
        }
        Ok(data)
    }

    /// Users matching the filter who owe at least one late fee
    pub async fn late_fees(&self, filter: &Filter) -> AppResult<Vec<User>> {
        let users = self.repository.users.list(filter).await?;
        Ok(users.into_iter().filter(User::has_fees).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::validate_payload, repository::memory::MemoryDocumentStore};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn service() -> UsersService {
        UsersService::new(Repository::new(Arc::new(MemoryDocumentStore::new())))
    }

    fn new_user(name: &str, fees: Value) -> CreateUser {
        validate_payload(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "borrowed": [],
            "reserved": [],
            "fees": fees
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_late_fees_is_dense() {
        let users = service();
        users.create_user(new_user("Ann", json!([]))).await.unwrap();
        users
            .create_user(new_user(
                "Bob",
                json!([{
                    "bookID": "3", "copyID": "c2", "dueDate": "2017-05-01",
                    "returnDate": "2017-05-10", "fee": "0.90"
                }]),
            ))
            .await
            .unwrap();
        users.create_user(new_user("Cy", json!([]))).await.unwrap();
        users.create_user(new_user("Di", Value::Null)).await.unwrap();

        let owing = users.late_fees(&Filter::all()).await.unwrap();
        assert_eq!(owing.len(), 1);
        assert_eq!(owing[0].name, "Bob");
        assert_eq!(owing[0].id, 2);
    }

    #[tokio::test]
    async fn test_create_get_and_update() {
        let users = service();
        let created = users.create_user(new_user("Ann", json!([]))).await.unwrap();
        assert_eq!(created.id, 1);

        let update: UpdateUser =
            validate_payload(json!({ "_id": 1, "email": "ann@library.test" })).unwrap();
        users.update_user(update).await.unwrap();

        let stored = users.get_user(1).await.unwrap();
        assert_eq!(stored.email, "ann@library.test");
        assert_eq!(stored.name, "Ann");
    }
}
