use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use headers::{Header, HeaderName, HeaderValue};

use crate::auth::tokens_match;
use crate::error::ApiError;
use crate::models::AppState;

pub static TOKEN_HEADER: HeaderName = HeaderName::from_static("token");

/// The raw `TOKEN` request header.
#[derive(Debug, Clone)]
pub struct TokenHeader(pub String);

impl Header for TokenHeader {
    fn name() -> &'static HeaderName {
        &TOKEN_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let token = value.to_str().map_err(|_| headers::Error::invalid())?;
        Ok(TokenHeader(token.trim().to_string()))
    }

    fn encode<E>(&self, values: &mut E)
    where
        E: Extend<HeaderValue>,
    {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(value));
        }
    }
}

/// Proof that the request carried the configured shared secret.
/// Put it before `Path`/body extractors so unauthenticated calls stop here.
#[derive(Debug, Clone, Copy)]
pub struct ApiToken;

impl FromRequestParts<AppState> for ApiToken {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let TypedHeader(TokenHeader(token)) =
                TypedHeader::<TokenHeader>::from_request_parts(parts, state)
                    .await
                    .map_err(|rejection| {
                        if matches!(rejection.reason(), TypedHeaderRejectionReason::Missing) {
                            ApiError::token_not_found()
                        } else {
                            ApiError::invalid_token()
                        }
                    })?;

            if token.is_empty() {
                return Err(ApiError::token_not_found());
            }
            if !tokens_match(&token, &state.api_token) {
                tracing::warn!(path = %parts.uri.path(), "rejected request with invalid token");
                return Err(ApiError::invalid_token());
            }
            Ok(ApiToken)
        }
    }
}
