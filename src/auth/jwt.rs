//! JWT issue and validation.

use crate::error::{AppError, AppResult};
use crate::models::PrincipalClaims;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Validity window of an issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub principal: PrincipalClaims,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtSecret {
    secret: String,
}

impl JwtSecret {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Fails with `AppError::Config` when no signing secret is configured.
    pub fn ensure_configured(&self) -> AppResult<()> {
        if self.secret.trim().is_empty() {
            return Err(AppError::Config("JWT secret is not defined".to_string()));
        }
        Ok(())
    }

    pub fn issue(&self, principal: &PrincipalClaims) -> AppResult<String> {
        self.issue_at(principal, Utc::now())
    }

    /// Sign `principal` as if issued at `now`; the token expires `TOKEN_TTL_SECS` later.
    pub fn issue_at(&self, principal: &PrincipalClaims, now: DateTime<Utc>) -> AppResult<String> {
        self.ensure_configured()?;
        let claims = Claims {
            principal: principal.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("sign token: {}", e)))?;
        Ok(token)
    }

    /// Check signature and expiry, returning the claims embedded at issue time.
    pub fn verify(&self, token: &str) -> AppResult<PrincipalClaims> {
        self.ensure_configured()?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::ExpiredToken,
            _ => AppError::InvalidToken(e.to_string()),
        })?;
        Ok(data.claims.principal)
    }
}
