use abi::errors::Error;
use axum::{
    async_trait,
    extract::{rejection::QueryRejection, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use serde::de::DeserializeOwned;

pub struct QueryExtractor<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryExtractor<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Error);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => {
                let status = match rejection {
                    QueryRejection::FailedToDeserializeQueryString(_) => StatusCode::BAD_REQUEST,
                    _ => rejection.status(),
                };
                Err((status, Error::body_parsing(rejection.body_text())))
            }
        }
    }
}
