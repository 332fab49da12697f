//! Storage contracts consumed by the services.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    CreateProductInput, NewUser, ProductRecord, UpdateProductInput, UserChanges, UserRecord,
};

pub type DynUserStore = Arc<dyn UserStore>;
pub type DynProductStore = Arc<dyn ProductStore>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `AppError::Duplicate` when the email is taken.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>>;

    async fn find_all(&self) -> AppResult<Vec<UserRecord>>;

    /// Returns the updated record, or `None` when no user has this id.
    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<UserRecord>>;

    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, product: CreateProductInput) -> AppResult<ProductRecord>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProductRecord>>;

    async fn find_all(&self) -> AppResult<Vec<ProductRecord>>;

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: UpdateProductInput,
    ) -> AppResult<Option<ProductRecord>>;

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;

    /// Full-text search over name and description; any term may match.
    ///
    /// Matching is backend-specific. Postgres applies English stemming and
    /// drops stop words, so "apples" finds "Apple". The in-memory store only
    /// matches whole words, case-insensitively.
    async fn search(&self, text: &str) -> AppResult<Vec<ProductRecord>>;
}
