use axum::{Router, routing::post};

pub mod forecast;
pub mod products;
pub mod system;

/// Router for all forecasting endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/forecast_and_reorder", post(forecast::forecast_and_reorder))
        .nest("/products", products::router())
}
