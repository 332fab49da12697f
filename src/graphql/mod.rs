//! GraphQL schema assembled from per-resource registration tables.

mod product;
mod table;
mod user;

use async_graphql::dynamic::{Object, Schema, SchemaError};

use crate::services::{AuthService, CatalogService};

pub use table::{FieldSpec, Record, Scalar};

pub type AppSchema = Schema;

const QUERY: &str = "Query";
const MUTATION: &str = "Mutation";

/// Build the schema with the services it resolves against.
pub fn build_schema(auth: AuthService, catalog: CatalogService) -> Result<AppSchema, SchemaError> {
    let query = product::register_queries(user::register_queries(Object::new(QUERY)));
    let mutation = product::register_mutations(user::register_mutations(Object::new(MUTATION)));

    let builder = Schema::build(QUERY, Some(MUTATION), None)
        .register(query)
        .register(mutation);
    user::types()
        .into_iter()
        .chain(product::types())
        .fold(builder, |builder, ty| builder.register(ty))
        .data(auth)
        .data(catalog)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtSecret;
    use crate::db::MemoryStore;
    use std::sync::Arc;

    fn schema() -> AppSchema {
        let store = MemoryStore::new();
        let auth = AuthService::new(
            Arc::new(store.clone()),
            JwtSecret::new("test-jwt-secret-min-32-chars!!".to_string()),
        );
        let catalog = CatalogService::new(Arc::new(store));
        build_schema(auth, catalog).unwrap()
    }

    #[test]
    fn sdl_lists_every_operation() {
        let sdl = schema().sdl();
        for op in [
            "users", "user(", "me", "products", "product(", "searchProducts(", "register(",
            "login(", "createUser(", "updateUser(", "deleteUser(", "createProduct(",
            "updateProduct(", "deleteProduct(",
        ] {
            assert!(sdl.contains(op), "missing {} in schema", op);
        }
        assert!(!sdl.contains("passwordHash"));
    }

    #[tokio::test]
    async fn product_round_trip_through_schema() {
        let schema = schema();
        let res = schema
            .execute(
                r#"mutation { createProduct(data: { name: "Lamp", price: 12 }) { id name price description } }"#,
            )
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let json = res.data.into_json().unwrap();
        assert_eq!(json["createProduct"]["name"], "Lamp");
        assert_eq!(json["createProduct"]["price"], 12.0);
        assert!(json["createProduct"]["description"].is_null());

        let res = schema
            .execute(r#"{ searchProducts(searchString: "lamp") { name } }"#)
            .await;
        let json = res.data.into_json().unwrap();
        assert_eq!(json["searchProducts"][0]["name"], "Lamp");
    }

    #[tokio::test]
    async fn malformed_id_is_bad_user_input() {
        let res = schema().execute(r#"{ user(id: "nope") { id } }"#).await;
        assert_eq!(res.errors.len(), 1);
        let code = res.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("BAD_USER_INPUT")));
    }
}
