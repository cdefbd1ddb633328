//! JSON body extractor with field validation

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use courier_common::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// `Json<T>` that also runs the DTO's `validator` rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::App(AppError::validation(e.body_text())))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
