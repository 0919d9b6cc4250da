use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_querystring::ParseMode;

use crate::infrastructure::http::api::ApiError;

/// Query parameters of the read-only listing endpoints (`?limit=5&offset=10`).
///
/// Values are plain `key=value` pairs; a malformed query is a 422 with the
/// usual error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryString<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryString<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        serde_querystring::from_str(query, ParseMode::UrlEncoded)
            .map(QueryString)
            .map_err(|e| ApiError::UnprocessableEntity(format!("invalid query string: {}", e)))
    }
}
