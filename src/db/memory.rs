//! In-memory store for local runs and tests. Insertion order is preserved.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProductInput, NewUser, ProductRecord, UpdateProductInput, UserChanges, UserRecord,
};

use super::store::{ProductStore, UserStore};

#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<UserRecord>>>,
    products: Arc<RwLock<Vec<ProductRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email() -> AppError {
    AppError::Duplicate("Email already registered".to_string())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            middle_name: user.middle_name,
            last_name: user.last_name,
            address: user.address,
            city: user.city,
            state: user.state,
            zipcode: user.zipcode,
            created_by: user.created_by,
            updated_by: None,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.users.read().await.clone())
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<UserRecord>> {
        let mut users = self.users.write().await;
        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(duplicate_email());
            }
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        changes.apply(user);
        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create(&self, product: CreateProductInput) -> AppResult<ProductRecord> {
        let record = ProductRecord {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            description: product.description,
        };
        self.products.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProductRecord>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<ProductRecord>> {
        Ok(self.products.read().await.clone())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: UpdateProductInput,
    ) -> AppResult<Option<ProductRecord>> {
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        changes.apply(product);
        Ok(Some(product.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn search(&self, text: &str) -> AppResult<Vec<ProductRecord>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| p.matches_text(text))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "A".to_string(),
            middle_name: None,
            last_name: "B".to_string(),
            address: "1 St".to_string(),
            city: "C".to_string(),
            state: None,
            zipcode: "00000".to_string(),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@b.com")).await.unwrap();
        let err = UserStore::create(&store, new_user("a@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
        assert_eq!(UserStore::find_all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_rejects_email_owned_by_someone_else() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@b.com")).await.unwrap();
        let other = UserStore::create(&store, new_user("c@d.com")).await.unwrap();
        let changes = UserChanges {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let err = UserStore::update_by_id(&store, other.id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_and_delete_missing_ids() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        assert!(UserStore::update_by_id(&store, missing, UserChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(!UserStore::delete_by_id(&store, missing).await.unwrap());
        assert!(!ProductStore::delete_by_id(&store, missing).await.unwrap());
    }

    #[tokio::test]
    async fn product_search_matches_any_term() {
        let store = MemoryStore::new();
        for (name, description) in [("Red Apple", "crunchy"), ("Banana", "yellow fruit")] {
            ProductStore::create(
                &store,
                CreateProductInput {
                    name: name.to_string(),
                    price: 1.0,
                    description: Some(description.to_string()),
                },
            )
            .await
            .unwrap();
        }
        let hits = store.search("apple fruit").await.unwrap();
        assert_eq!(hits.len(), 2);
        let hits = store.search("crunchy").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Red Apple");
        assert!(store.search("kiwi").await.unwrap().is_empty());
    }
}
