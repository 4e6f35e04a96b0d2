use std::sync::Arc;

use axum::{Json, extract::Extension, extract::rejection::JsonRejection};

use crate::app::dto::{ForecastRequest, ForecastResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Stateless variant: history and stock come from the request body.
pub async fn forecast_and_reorder(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    services.forecast_stateless(req).map(Json)
}
