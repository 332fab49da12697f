//! Product catalog: CRUD and text search.

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::db::DynProductStore;
use crate::error::{AppError, AppResult};
use crate::models::{CreateProductInput, ProductRecord, UpdateProductInput};

#[derive(Clone)]
pub struct CatalogService {
    products: DynProductStore,
}

impl CatalogService {
    pub fn new(products: DynProductStore) -> Self {
        Self { products }
    }

    pub async fn create(&self, input: CreateProductInput) -> AppResult<ProductRecord> {
        input.validate()?;
        let product = self.products.create(input).await?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub async fn list(&self) -> AppResult<Vec<ProductRecord>> {
        self.products.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<ProductRecord>> {
        self.products.find_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateProductInput) -> AppResult<ProductRecord> {
        input.validate()?;
        self.products
            .update_by_id(id, input)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Returns `false` when no product had this id.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.products.delete_by_id(id).await?;
        debug!(product_id = %id, deleted, "delete product");
        Ok(deleted)
    }

    pub async fn search(&self, text: &str) -> AppResult<Vec<ProductRecord>> {
        let hits = self.products.search(text).await?;
        debug!(search = %text, hits = hits.len(), "product search");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use std::sync::Arc;

    fn catalog() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    fn input(name: &str, price: f64, description: Option<&str>) -> CreateProductInput {
        CreateProductInput {
            name: name.to_string(),
            price,
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete() {
        let catalog = catalog();
        let product = catalog.create(input("Mug", 7.5, None)).await.unwrap();
        assert_eq!(catalog.get(product.id).await.unwrap(), Some(product.clone()));

        let updated = catalog
            .update(
                product.id,
                UpdateProductInput {
                    description: Some("ceramic".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Mug");
        assert_eq!(updated.description.as_deref(), Some("ceramic"));

        assert!(catalog.delete(product.id).await.unwrap());
        assert!(catalog.get(product.id).await.unwrap().is_none());
        assert!(!catalog.delete(product.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let err = catalog()
            .update(Uuid::new_v4(), UpdateProductInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let err = catalog().create(input("", 1.0, None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn search_and_list() {
        let catalog = catalog();
        catalog
            .create(input("Teapot", 20.0, Some("cast iron")))
            .await
            .unwrap();
        catalog.create(input("Kettle", 30.0, None)).await.unwrap();
        assert_eq!(catalog.list().await.unwrap().len(), 2);
        let hits = catalog.search("iron").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Teapot");
    }
}
