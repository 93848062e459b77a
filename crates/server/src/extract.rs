//! Request extractors for the item routes.
//!
//! Both report failures as [`JsonApiError`], so every bad request gets the
//! same `{"detail": ..}` body.

use std::num::IntErrorKind;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Json,
};
use models::item::ItemInput;

use crate::errors::JsonApiError;

/// JSON item body. A request without any `Content-Type` is still parsed as
/// JSON; a request with a non-JSON content type is rejected.
pub struct ItemBody(pub ItemInput);

#[async_trait]
impl<S> FromRequest<S> for ItemBody
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(CONTENT_TYPE) {
            let Json(input) = Json::<ItemInput>::from_request(req, state).await?;
            return Ok(Self(input));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonApiError::unprocessable(e.body_text()))?;
        let input = serde_json::from_slice(&bytes).map_err(|e| {
            JsonApiError::unprocessable(format!("Failed to parse the request body as JSON: {e}"))
        })?;
        Ok(Self(input))
    }
}

/// `{id}` path segment. Integers that do not fit in `i64` cannot name a stored
/// item, so they are reported as missing rather than malformed.
pub struct ItemId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        parse_item_id(&raw).map(Self)
    }
}

pub(crate) fn parse_item_id(raw: &str) -> Result<i64, JsonApiError> {
    raw.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => JsonApiError::not_found(),
        _ => JsonApiError::unprocessable(format!("Invalid item id `{raw}`: expected an integer")),
    })
}
