//! Bearer token extraction for the GraphQL endpoint.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use std::convert::Infallible;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw bearer token from the `Authorization` header, if any. Verification happens
/// in the resolvers that need a principal.
#[derive(Clone, Debug, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn from_parts(parts: &Parts) -> Self {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        BearerToken(token)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/graphql");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(
            BearerToken::from_parts(&parts(Some("Bearer abc.def.ghi"))).0.as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn ignores_missing_or_foreign_schemes() {
        assert!(BearerToken::from_parts(&parts(None)).0.is_none());
        assert!(BearerToken::from_parts(&parts(Some("Basic dXNlcg=="))).0.is_none());
        assert!(BearerToken::from_parts(&parts(Some("Bearer   "))).0.is_none());
    }
}
