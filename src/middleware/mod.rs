//! Request extractors shared by HTTP handlers.

pub mod auth;

pub use auth::BearerToken;
