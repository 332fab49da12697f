//! PostgreSQL repositories: users and products.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateProductInput, NewUser, ProductRecord, UpdateProductInput, UserChanges, UserRecord,
};

use super::store::{ProductStore, UserStore};
use super::DbPool;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, middle_name, last_name, \
                            address, city, state, zipcode, created_by, updated_by";

const PRODUCT_COLUMNS: &str = "id, name, price, description";

fn email_conflict(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Duplicate("Email already registered".to_string())
        }
        _ => AppError::Storage(e),
    }
}

/// Build a `to_tsquery` expression OR-ing the alphanumeric terms of `text`.
fn or_tsquery(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" | "))
    }
}

// ---- User ----

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, middle_name, last_name,
                               address, city, state, zipcode, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.middle_name)
            .bind(&user.last_name)
            .bind(&user.address)
            .bind(&user.city)
            .bind(&user.state)
            .bind(&user.zipcode)
            .bind(user.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(email_conflict)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> AppResult<Vec<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
        let rows = sqlx::query_as::<_, UserRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<UserRecord>> {
        let sql = format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                first_name = COALESCE($4, first_name),
                middle_name = COALESCE($5, middle_name),
                last_name = COALESCE($6, last_name),
                address = COALESCE($7, address),
                city = COALESCE($8, city),
                state = COALESCE($9, state),
                zipcode = COALESCE($10, zipcode),
                updated_by = COALESCE($11, updated_by)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .bind(&changes.email)
            .bind(&changes.password_hash)
            .bind(&changes.first_name)
            .bind(&changes.middle_name)
            .bind(&changes.last_name)
            .bind(&changes.address)
            .bind(&changes.city)
            .bind(&changes.state)
            .bind(&changes.zipcode)
            .bind(changes.updated_by)
            .fetch_optional(&self.pool)
            .await
            .map_err(email_conflict)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let r = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }
}

// ---- Product ----

#[derive(Clone)]
pub struct PgProductStore {
    pool: DbPool,
}

impl PgProductStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, product: CreateProductInput) -> AppResult<ProductRecord> {
        let sql = format!(
            "INSERT INTO products (id, name, price, description) VALUES ($1, $2, $3, $4) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProductRecord>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> AppResult<Vec<ProductRecord>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at");
        let rows = sqlx::query_as::<_, ProductRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: UpdateProductInput,
    ) -> AppResult<Option<ProductRecord>> {
        let sql = format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                description = COALESCE($4, description)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.price)
            .bind(&changes.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let r = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }

    async fn search(&self, text: &str) -> AppResult<Vec<ProductRecord>> {
        let Some(query) = or_tsquery(text) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE to_tsvector('english', name || ' ' || coalesce(description, ''))
                  @@ to_tsquery('english', $1)
            ORDER BY created_at
            "#
        );
        let rows = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
