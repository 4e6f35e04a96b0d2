use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::QueryRejection},
    routing::{get, post},
};

use restock_infra::ProductRef;

use crate::app::dto::{ForecastResponse, HistoryQuery, RecommendationHistoryResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:product/forecast", post(forecast_product))
        .route("/:product/recommendations", get(list_recommendations))
}

/// Persisted variant: `product` is a product id (UUID) or an exact product name.
pub async fn forecast_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product): Path<String>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let product = ProductRef::parse(&product)?;
    services.forecast_product(&product).await.map(Json)
}

pub async fn list_recommendations(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<RecommendationHistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let product = ProductRef::parse(&product)?;
    services
        .recommendation_history(&product, query.limit())
        .await
        .map(Json)
}
