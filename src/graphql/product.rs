//! Product queries and mutations.

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, Type, TypeRef};
use async_graphql::{ResultExt, Value};

use super::table::{arg, id_arg, input_type, object_type, optional, required, FieldSpec, Record, Scalar};
use crate::models::{CreateProductInput, ProductRecord, UpdateProductInput};
use crate::services::CatalogService;

pub const PRODUCT_TYPE: &str = "Product";
pub const CREATE_PRODUCT_INPUT: &str = "CreateProductInput";
pub const UPDATE_PRODUCT_INPUT: &str = "UpdateProductInput";

const PRODUCT_FIELDS: &[FieldSpec] = &[
    required("id", Scalar::Id),
    required("name", Scalar::String),
    required("price", Scalar::Float),
    optional("description", Scalar::String),
];

const CREATE_FIELDS: &[FieldSpec] = &[
    required("name", Scalar::String),
    required("price", Scalar::Float),
    optional("description", Scalar::String),
];

const UPDATE_FIELDS: &[FieldSpec] = &[
    optional("name", Scalar::String),
    optional("price", Scalar::Float),
    optional("description", Scalar::String),
];

pub fn types() -> Vec<Type> {
    vec![
        object_type(PRODUCT_TYPE, PRODUCT_FIELDS).into(),
        input_type(CREATE_PRODUCT_INPUT, CREATE_FIELDS).into(),
        input_type(UPDATE_PRODUCT_INPUT, UPDATE_FIELDS).into(),
    ]
}

fn product_value(product: &ProductRecord) -> async_graphql::Result<FieldValue<'static>> {
    Ok(FieldValue::owned_any(Record::from_serialize(product)?))
}

fn product_list(products: &[ProductRecord]) -> async_graphql::Result<FieldValue<'static>> {
    let values = products
        .iter()
        .map(product_value)
        .collect::<async_graphql::Result<Vec<_>>>()?;
    Ok(FieldValue::list(values))
}

fn id_input() -> InputValue {
    InputValue::new("id", TypeRef::named_nn(TypeRef::ID))
}

pub fn register_queries(query: Object) -> Object {
    query
        .field(Field::new(
            "products",
            TypeRef::named_nn_list_nn(PRODUCT_TYPE),
            |ctx| {
                FieldFuture::new(async move {
                    let catalog = ctx.data::<CatalogService>()?;
                    let products = catalog.list().await.extend()?;
                    Ok(Some(product_list(&products)?))
                })
            },
        ))
        .field(
            Field::new("product", TypeRef::named(PRODUCT_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let catalog = ctx.data::<CatalogService>()?;
                    let id = id_arg(&ctx, "id").extend()?;
                    match catalog.get(id).await.extend()? {
                        Some(product) => Ok(Some(product_value(&product)?)),
                        None => Ok(None),
                    }
                })
            })
            .argument(id_input()),
        )
        .field(
            Field::new(
                "searchProducts",
                TypeRef::named_nn_list_nn(PRODUCT_TYPE),
                |ctx| {
                    FieldFuture::new(async move {
                        let catalog = ctx.data::<CatalogService>()?;
                        let text: String = arg(&ctx, "searchString").extend()?;
                        let products = catalog.search(&text).await.extend()?;
                        Ok(Some(product_list(&products)?))
                    })
                },
            )
            .argument(InputValue::new(
                "searchString",
                TypeRef::named_nn(TypeRef::STRING),
            )),
        )
}

pub fn register_mutations(mutation: Object) -> Object {
    mutation
        .field(
            Field::new("createProduct", TypeRef::named_nn(PRODUCT_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let catalog = ctx.data::<CatalogService>()?;
                    let input: CreateProductInput = arg(&ctx, "data").extend()?;
                    let product = catalog.create(input).await.extend()?;
                    Ok(Some(product_value(&product)?))
                })
            })
            .argument(InputValue::new(
                "data",
                TypeRef::named_nn(CREATE_PRODUCT_INPUT),
            )),
        )
        .field(
            Field::new("updateProduct", TypeRef::named_nn(PRODUCT_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let catalog = ctx.data::<CatalogService>()?;
                    let id = id_arg(&ctx, "id").extend()?;
                    let input: UpdateProductInput = arg(&ctx, "data").extend()?;
                    let product = catalog.update(id, input).await.extend()?;
                    Ok(Some(product_value(&product)?))
                })
            })
            .argument(id_input())
            .argument(InputValue::new(
                "data",
                TypeRef::named_nn(UPDATE_PRODUCT_INPUT),
            )),
        )
        .field(
            Field::new("deleteProduct", TypeRef::named_nn(TypeRef::BOOLEAN), |ctx| {
                FieldFuture::new(async move {
                    let catalog = ctx.data::<CatalogService>()?;
                    let id = id_arg(&ctx, "id").extend()?;
                    let deleted = catalog.delete(id).await.extend()?;
                    Ok(Some(Value::from(deleted)))
                })
            })
            .argument(id_input()),
        )
}
