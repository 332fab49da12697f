//! Field tables and the glue that turns them into GraphQL types.
//!
//! Output objects are served from a [`Record`]: the serde image of a typed
//! model. Inputs go the other way through `from_value`, so the wire mapping
//! of each model is its serde mapping.

use async_graphql::dynamic::{
    Field, FieldFuture, InputObject, InputValue, Object, ResolverContext, TypeRef,
};
use async_graphql::{Name, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Id,
    String,
    Float,
}

impl Scalar {
    fn type_name(self) -> &'static str {
        match self {
            Scalar::Id => TypeRef::ID,
            Scalar::String => TypeRef::STRING,
            Scalar::Float => TypeRef::FLOAT,
        }
    }
}

/// One row of a type table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub scalar: Scalar,
    pub required: bool,
}

pub const fn required(name: &'static str, scalar: Scalar) -> FieldSpec {
    FieldSpec {
        name,
        scalar,
        required: true,
    }
}

pub const fn optional(name: &'static str, scalar: Scalar) -> FieldSpec {
    FieldSpec {
        name,
        scalar,
        required: false,
    }
}

impl FieldSpec {
    pub fn type_ref(&self) -> TypeRef {
        if self.required {
            TypeRef::named_nn(self.scalar.type_name())
        } else {
            TypeRef::named(self.scalar.type_name())
        }
    }
}

/// Build an output object whose fields read from the parent [`Record`].
pub fn object_type(name: &str, fields: &[FieldSpec]) -> Object {
    fields.iter().fold(Object::new(name), |object, column| {
        let field_name = column.name;
        object.field(Field::new(field_name, column.type_ref(), move |ctx| {
            FieldFuture::new(async move {
                let record = ctx.parent_value.try_downcast_ref::<Record>()?;
                Ok(record.get(field_name))
            })
        }))
    })
}

/// Build an input object from a table.
pub fn input_type(name: &str, fields: &[FieldSpec]) -> InputObject {
    fields.iter().fold(InputObject::new(name), |input, column| {
        input.field(InputValue::new(column.name, column.type_ref()))
    })
}

/// A model rendered as a GraphQL object value.
#[derive(Debug, Clone)]
pub struct Record(Value);

impl Record {
    pub fn from_serialize<T: Serialize>(model: &T) -> async_graphql::Result<Self> {
        match async_graphql::to_value(model)? {
            value @ Value::Object(_) => Ok(Record(value)),
            _ => Err("model does not map to an object".into()),
        }
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        match &self.0 {
            Value::Object(map) => map.get(field).cloned(),
            _ => None,
        }
    }

    /// Add or replace one field.
    pub fn with(mut self, field: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.0 {
            map.insert(Name::new(field), value);
        }
        self
    }
}

/// Deserialize argument `name` into a typed input.
pub fn arg<T: DeserializeOwned>(ctx: &ResolverContext<'_>, name: &str) -> Result<T, AppError> {
    let value = ctx
        .args
        .get(name)
        .ok_or_else(|| AppError::Validation(format!("missing argument `{}`", name)))?;
    parse_input(name, value.as_value().clone())
}

fn parse_input<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, AppError> {
    async_graphql::from_value(value)
        .map_err(|e| AppError::Validation(format!("{}: {}", name, e)))
}

/// Read an `ID` argument as a UUID.
pub fn id_arg(ctx: &ResolverContext<'_>, name: &str) -> Result<Uuid, AppError> {
    let raw = ctx
        .args
        .get(name)
        .and_then(|v| v.string().ok().map(str::to_string))
        .ok_or_else(|| AppError::Validation(format!("missing argument `{}`", name)))?;
    Uuid::parse_str(&raw).map_err(|_| AppError::Validation(format!("invalid id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        first_name: String,
        price: f64,
        note: Option<String>,
    }

    #[test]
    fn record_exposes_serde_fields() {
        let record = Record::from_serialize(&Sample {
            first_name: "A".to_string(),
            price: 2.5,
            note: None,
        })
        .unwrap();
        assert_eq!(record.get("firstName"), Some(Value::from("A")));
        assert_eq!(record.get("note"), Some(Value::Null));
        assert_eq!(record.get("missing"), None);

        let record = record.with("token", Value::from("t"));
        assert_eq!(record.get("token"), Some(Value::from("t")));
    }

    #[test]
    fn scalars_are_not_records() {
        assert!(Record::from_serialize(&42).is_err());
    }

    #[test]
    fn field_spec_nullability() {
        assert_eq!(required("id", Scalar::Id).type_ref().to_string(), "ID!");
        assert_eq!(optional("state", Scalar::String).type_ref().to_string(), "String");
    }

    #[derive(Debug, serde::Deserialize)]
    struct Priced {
        #[allow(dead_code)]
        price: f64,
    }

    #[test]
    fn undecodable_input_is_a_validation_error() {
        let value = Value::from_json(serde_json::json!({ "price": "cheap" })).unwrap();
        let err = parse_input::<Priced>("data", value).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.starts_with("data: ")));
        assert_eq!(err.code(), "BAD_USER_INPUT");

        let value = Value::from_json(serde_json::json!({ "price": 2.5 })).unwrap();
        assert!(parse_input::<Priced>("data", value).is_ok());
    }
}
