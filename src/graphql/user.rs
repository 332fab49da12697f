//! User queries and mutations.

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext, Type, TypeRef,
};
use async_graphql::{ErrorExtensions, ResultExt, Value};
use uuid::Uuid;

use super::table::{arg, id_arg, input_type, object_type, optional, required, FieldSpec, Record, Scalar};
use crate::error::AppError;
use crate::middleware::BearerToken;
use crate::models::{LoginInput, PrincipalClaims, RegisterInput, UpdateUserInput};
use crate::services::AuthService;

pub const USER_TYPE: &str = "User";
pub const TOKEN_TYPE: &str = "Token";
pub const REGISTER_INPUT: &str = "RegisterInput";
pub const LOGIN_INPUT: &str = "LoginInput";
pub const UPDATE_USER_INPUT: &str = "UpdateUserInput";

const USER_FIELDS: &[FieldSpec] = &[
    required("id", Scalar::Id),
    required("email", Scalar::String),
    required("firstName", Scalar::String),
    optional("middleName", Scalar::String),
    required("lastName", Scalar::String),
    required("address", Scalar::String),
    required("city", Scalar::String),
    optional("state", Scalar::String),
    required("zipcode", Scalar::String),
    optional("createdBy", Scalar::Id),
    optional("updatedBy", Scalar::Id),
    optional("token", Scalar::String),
];

const TOKEN_FIELDS: &[FieldSpec] = &[required("token", Scalar::String)];

const REGISTER_FIELDS: &[FieldSpec] = &[
    required("email", Scalar::String),
    required("password", Scalar::String),
    required("firstName", Scalar::String),
    optional("middleName", Scalar::String),
    required("lastName", Scalar::String),
    required("address", Scalar::String),
    required("city", Scalar::String),
    optional("state", Scalar::String),
    required("zipcode", Scalar::String),
];

const LOGIN_FIELDS: &[FieldSpec] = &[
    required("email", Scalar::String),
    required("password", Scalar::String),
];

const UPDATE_FIELDS: &[FieldSpec] = &[
    optional("email", Scalar::String),
    optional("password", Scalar::String),
    optional("firstName", Scalar::String),
    optional("middleName", Scalar::String),
    optional("lastName", Scalar::String),
    optional("address", Scalar::String),
    optional("city", Scalar::String),
    optional("state", Scalar::String),
    optional("zipcode", Scalar::String),
];

/// Message shared by both login failures, so callers cannot tell which one happened.
const LOGIN_FAILED: &str = "Invalid email or password";

fn login_failed() -> async_graphql::Error {
    async_graphql::Error::new(LOGIN_FAILED).extend_with(|_, ext| ext.set("code", "UNAUTHENTICATED"))
}

pub fn types() -> Vec<Type> {
    vec![
        object_type(USER_TYPE, USER_FIELDS).into(),
        object_type(TOKEN_TYPE, TOKEN_FIELDS).into(),
        input_type(REGISTER_INPUT, REGISTER_FIELDS).into(),
        input_type(LOGIN_INPUT, LOGIN_FIELDS).into(),
        input_type(UPDATE_USER_INPUT, UPDATE_FIELDS).into(),
    ]
}

fn user_value(claims: &PrincipalClaims) -> async_graphql::Result<FieldValue<'static>> {
    Ok(FieldValue::owned_any(Record::from_serialize(claims)?))
}

fn bearer<'a>(ctx: &'a ResolverContext<'_>) -> Option<&'a str> {
    ctx.data_opt::<BearerToken>().and_then(|t| t.0.as_deref())
}

/// The caller's user id, when a bearer token was sent. A token that fails
/// verification is an error rather than an anonymous call.
fn actor(ctx: &ResolverContext<'_>, auth: &AuthService) -> Result<Option<Uuid>, AppError> {
    bearer(ctx)
        .map(|token| auth.authenticate(token).map(|claims| claims.id))
        .transpose()
}

fn id_input() -> InputValue {
    InputValue::new("id", TypeRef::named_nn(TypeRef::ID))
}

fn data_input(input_type: &str) -> InputValue {
    InputValue::new("data", TypeRef::named_nn(input_type))
}

pub fn register_queries(query: Object) -> Object {
    query
        .field(Field::new(
            "users",
            TypeRef::named_nn_list_nn(USER_TYPE),
            |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let users = auth.list_users().await.extend()?;
                    let values = users
                        .iter()
                        .map(user_value)
                        .collect::<async_graphql::Result<Vec<_>>>()?;
                    Ok(Some(FieldValue::list(values)))
                })
            },
        ))
        .field(
            Field::new("user", TypeRef::named(USER_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let id = id_arg(&ctx, "id").extend()?;
                    match auth.get_user(id).await.extend()? {
                        Some(claims) => Ok(Some(user_value(&claims)?)),
                        None => Ok(None),
                    }
                })
            })
            .argument(id_input()),
        )
        .field(Field::new("me", TypeRef::named_nn(USER_TYPE), |ctx| {
            FieldFuture::new(async move {
                let auth = ctx.data::<AuthService>()?;
                let token = bearer(&ctx)
                    .ok_or_else(|| AppError::InvalidToken("missing bearer token".to_string()))
                    .extend()?;
                let claims = auth.authenticate(token).extend()?;
                Ok(Some(user_value(&claims)?))
            })
        }))
}

pub fn register_mutations(mutation: Object) -> Object {
    mutation
        .field(
            Field::new("register", TypeRef::named_nn(USER_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let input: RegisterInput = arg(&ctx, "data").extend()?;
                    let (claims, token) = auth.register(input).await.extend()?;
                    let record = Record::from_serialize(&claims)?.with("token", Value::from(token));
                    Ok(Some(FieldValue::owned_any(record)))
                })
            })
            .argument(data_input(REGISTER_INPUT)),
        )
        .field(
            Field::new("login", TypeRef::named_nn(TOKEN_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let input: LoginInput = arg(&ctx, "data").extend()?;
                    let token = auth.login(input).await.map_err(|e| match e {
                        AppError::NotFound(_) | AppError::InvalidCredentials => login_failed(),
                        other => other.extend(),
                    })?;
                    let record = Record::from_serialize(&serde_json::json!({ "token": token }))?;
                    Ok(Some(FieldValue::owned_any(record)))
                })
            })
            .argument(data_input(LOGIN_INPUT)),
        )
        .field(
            Field::new("createUser", TypeRef::named_nn(USER_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let input: RegisterInput = arg(&ctx, "data").extend()?;
                    let actor = actor(&ctx, auth).extend()?;
                    let claims = auth.create_user(input, actor).await.extend()?;
                    Ok(Some(user_value(&claims)?))
                })
            })
            .argument(data_input(REGISTER_INPUT)),
        )
        .field(
            Field::new("updateUser", TypeRef::named(USER_TYPE), |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let id = id_arg(&ctx, "id").extend()?;
                    let input: UpdateUserInput = arg(&ctx, "data").extend()?;
                    let actor = actor(&ctx, auth).extend()?;
                    let claims = auth.update_user(id, input, actor).await.extend()?;
                    Ok(Some(user_value(&claims)?))
                })
            })
            .argument(id_input())
            .argument(data_input(UPDATE_USER_INPUT)),
        )
        .field(
            Field::new("deleteUser", TypeRef::named_nn(TypeRef::BOOLEAN), |ctx| {
                FieldFuture::new(async move {
                    let auth = ctx.data::<AuthService>()?;
                    let id = id_arg(&ctx, "id").extend()?;
                    let deleted = auth.delete_user(id).await.extend()?;
                    Ok(Some(Value::from(deleted)))
                })
            })
            .argument(id_input()),
        )
}
