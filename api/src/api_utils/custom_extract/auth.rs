use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};

use abi::errors::Error;

use crate::handlers::users::Claims;
use crate::AppState;

const BEARER: &str = "Bearer ";

/// id of the user the bearer token was issued to
pub struct AuthExtractor(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthExtractor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix(BEARER))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized_with_details("Not authorized, no token"))?;

        // expiry is checked by the default validation
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(Self(data.claims.sub))
    }
}
