//! User records, principal claims and user-facing inputs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// A persisted user. `password_hash` never leaves the service boundary.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zipcode: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl UserRecord {
    /// Project the record onto the claims that are safe to expose and sign.
    pub fn to_claims(&self) -> PrincipalClaims {
        PrincipalClaims {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zipcode: self.zipcode.clone(),
            created_by: self.created_by,
            updated_by: self.updated_by,
        }
    }
}

/// Public profile of a user: what tokens carry and what the API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalClaims {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zipcode: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl From<&UserRecord> for PrincipalClaims {
    fn from(user: &UserRecord) -> Self {
        user.to_claims()
    }
}

/// Input for `register` and `createUser`.
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    pub password: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub state: Option<String>,
    #[validate(length(min = 1))]
    pub zipcode: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("zipcode", &self.zipcode)
            .finish()
    }
}

/// Input for `login`.
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Input for `updateUser`. Absent fields are left untouched.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

impl fmt::Debug for UpdateUserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserInput")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("zipcode", &self.zipcode)
            .finish()
    }
}

/// A user about to be inserted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zipcode: String,
    pub created_by: Option<Uuid>,
}

impl NewUser {
    pub fn from_input(input: RegisterInput, password_hash: String) -> Self {
        Self {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            middle_name: input.middle_name,
            last_name: input.last_name,
            address: input.address,
            city: input.city,
            state: input.state,
            zipcode: input.zipcode,
            created_by: None,
        }
    }
}

/// Field changes handed to the store. The password, if any, is already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub updated_by: Option<Uuid>,
}

impl UserChanges {
    pub fn from_input(input: UpdateUserInput, password_hash: Option<String>) -> Self {
        Self {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            middle_name: input.middle_name,
            last_name: input.last_name,
            address: input.address,
            city: input.city,
            state: input.state,
            zipcode: input.zipcode,
            updated_by: None,
        }
    }

    /// Apply the changes to a record in place.
    pub fn apply(self, user: &mut UserRecord) {
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if self.middle_name.is_some() {
            user.middle_name = self.middle_name;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.address {
            user.address = v;
        }
        if let Some(v) = self.city {
            user.city = v;
        }
        if self.state.is_some() {
            user.state = self.state;
        }
        if let Some(v) = self.zipcode {
            user.zipcode = v;
        }
        if self.updated_by.is_some() {
            user.updated_by = self.updated_by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_input() -> RegisterInput {
        RegisterInput {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            first_name: "A".to_string(),
            middle_name: None,
            last_name: "B".to_string(),
            address: "1 St".to_string(),
            city: "C".to_string(),
            state: None,
            zipcode: "00000".to_string(),
        }
    }

    #[test]
    fn register_input_validates() {
        assert!(register_input().validate().is_ok());

        let mut short = register_input();
        short.password = "12345".to_string();
        assert!(short.validate().is_err());

        let mut long = register_input();
        long.password = "x".repeat(21);
        assert!(long.validate().is_err());

        let mut bad_email = register_input();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut no_city = register_input();
        no_city.city = String::new();
        assert!(no_city.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", register_input());
        assert!(!rendered.contains("secret1"));
        assert!(rendered.contains("<redacted>"));

        let login = LoginInput {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(!format!("{:?}", login).contains("secret1"));
    }

    #[test]
    fn claims_exclude_hash_and_serialize_camel_case() {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            first_name: "A".to_string(),
            middle_name: None,
            last_name: "B".to_string(),
            address: "1 St".to_string(),
            city: "C".to_string(),
            state: Some("ST".to_string()),
            zipcode: "00000".to_string(),
            created_by: None,
            updated_by: None,
        };
        let json = serde_json::to_value(user.to_claims()).unwrap();
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["state"], "ST");
        assert!(!json.to_string().contains("$2b$10$hash"));
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn changes_only_touch_present_fields() {
        let mut user = UserRecord {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "h".to_string(),
            first_name: "A".to_string(),
            middle_name: Some("M".to_string()),
            last_name: "B".to_string(),
            address: "1 St".to_string(),
            city: "C".to_string(),
            state: None,
            zipcode: "00000".to_string(),
            created_by: None,
            updated_by: None,
        };
        let changes = UserChanges {
            city: Some("D".to_string()),
            ..Default::default()
        };
        changes.apply(&mut user);
        assert_eq!(user.city, "D");
        assert_eq!(user.middle_name.as_deref(), Some("M"));
        assert_eq!(user.password_hash, "h");
    }
}
