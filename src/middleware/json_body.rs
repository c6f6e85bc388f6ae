use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` whose rejections (bad syntax, wrong shape, missing content
/// type) all surface as a 400 in the failure envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T: DeserializeOwned> JsonBody<T> {
    /// Decode a buffered body. PUT/PATCH take the body as `Bytes` and call
    /// this once the target record is known to exist.
    pub fn parse(bytes: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(bytes).map_err(|e| {
            tracing::debug!(reason = %e, "rejected request body");
            ApiError::invalid_json()
        })
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request(
        req: Request,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "rejected request body");
                ApiError::invalid_json()
            })?;
            Ok(JsonBody(value))
        }
    }
}
