//! Authentication: password hashing and JWT sessions.

mod jwt;
mod password;

pub use jwt::{Claims, JwtSecret, TOKEN_TTL_SECS};
pub use password::{CredentialHasher, HASH_COST, MAX_PASSWORD_BYTES};
