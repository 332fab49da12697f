//! User accounts and sessions: registration, login, profile changes.
//!
//! Every path that accepts a password hashes it here before it reaches the
//! store; every path that hands out a principal goes through `to_claims`.

use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{CredentialHasher, JwtSecret};
use crate::db::DynUserStore;
use crate::error::{AppError, AppResult};
use crate::models::{
    LoginInput, NewUser, PrincipalClaims, RegisterInput, UpdateUserInput, UserChanges,
};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

#[derive(Clone)]
pub struct AuthService {
    users: DynUserStore,
    tokens: JwtSecret,
}

impl AuthService {
    pub fn new(users: DynUserStore, tokens: JwtSecret) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &JwtSecret {
        &self.tokens
    }

    /// Create an account and sign a token for it. The signing secret is checked
    /// first so that a misconfigured server never persists a user it cannot log in.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> AppResult<(PrincipalClaims, String)> {
        self.tokens.ensure_configured()?;
        let claims = self.insert_user(input, None).await?;
        let token = self.tokens.issue(&claims)?;
        info!(user_id = %claims.id, "user registered");
        Ok((claims, token))
    }

    /// Check credentials and sign a token.
    ///
    /// An unknown email still pays for one bcrypt verification so both failure
    /// paths take comparable time.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> AppResult<String> {
        input.validate()?;
        let Some(user) = self.users.find_by_email(&input.email).await? else {
            CredentialHasher::verify_dummy(&input.password);
            debug!("login rejected: unknown email");
            return Err(user_not_found());
        };
        if !CredentialHasher::verify(&input.password, &user.password_hash)? {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }
        let token = self.tokens.issue(&user.to_claims())?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Create an account without signing a token. `actor` is recorded as `created_by`.
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn create_user(
        &self,
        input: RegisterInput,
        actor: Option<Uuid>,
    ) -> AppResult<PrincipalClaims> {
        let claims = self.insert_user(input, actor).await?;
        info!(user_id = %claims.id, "user created");
        Ok(claims)
    }

    /// Apply a profile patch. A new password is re-hashed before it is stored;
    /// `actor` is recorded as `updated_by`.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: Uuid,
        input: UpdateUserInput,
        actor: Option<Uuid>,
    ) -> AppResult<PrincipalClaims> {
        input.validate()?;
        let password_hash = match input.password.as_deref() {
            Some(password) => Some(CredentialHasher::hash(password)?),
            None => None,
        };
        let password_changed = password_hash.is_some();
        let changes = UserChanges {
            updated_by: actor,
            ..UserChanges::from_input(input, password_hash)
        };
        let user = self
            .users
            .update_by_id(id, changes)
            .await?
            .ok_or_else(user_not_found)?;
        if password_changed {
            debug!("password changed");
        }
        Ok(user.to_claims())
    }

    pub async fn list_users(&self) -> AppResult<Vec<PrincipalClaims>> {
        let users = self.users.find_all().await?;
        Ok(users.iter().map(PrincipalClaims::from).collect())
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<Option<PrincipalClaims>> {
        let user = self.users.find_by_id(id).await?;
        Ok(user.as_ref().map(PrincipalClaims::from))
    }

    /// Returns `false` when no user had this id.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.users.delete_by_id(id).await?;
        debug!(deleted, "delete user");
        Ok(deleted)
    }

    /// Resolve a bearer token to the claims it was issued with.
    pub fn authenticate(&self, token: &str) -> AppResult<PrincipalClaims> {
        self.tokens.verify(token)
    }

    async fn insert_user(
        &self,
        input: RegisterInput,
        created_by: Option<Uuid>,
    ) -> AppResult<PrincipalClaims> {
        input.validate()?;
        let password_hash = CredentialHasher::hash(&input.password)?;
        let new_user = NewUser {
            created_by,
            ..NewUser::from_input(input, password_hash)
        };
        let user = self.users.create(new_user).await?;
        Ok(user.to_claims())
    }
}
