use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::json;

use restock_api::app::{build_app, services::AppServices};
use restock_core::ProductId;
use restock_infra::{AppConfig, InMemoryCatalog, InMemoryRecommendationLog, ProductRecord};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seeded_catalog() -> (Arc<InMemoryCatalog>, ProductId) {
    let catalog = InMemoryCatalog::arc();
    let id = ProductId::new();
    catalog
        .upsert_product(
            ProductRecord::new(id, "Blue Widget", 5)
                .with_lead_time_days(14)
                .with_minimum_order_quantity(3)
                .with_safety_stock(2),
        )
        .unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for (week, units) in [(0, 50), (1, 10), (2, 12), (3, 8)] {
        catalog
            .record_sales(id, start + chrono::Duration::weeks(week), units)
            .unwrap();
    }
    (catalog, id)
}

async fn persisted_server() -> (TestServer, ProductId) {
    let (catalog, id) = seeded_catalog();
    let config = AppConfig {
        history_periods: 3,
        ..AppConfig::default()
    };
    let services =
        AppServices::with_persistence(&config, catalog, InMemoryRecommendationLog::arc());
    (TestServer::spawn(services).await, id)
}

#[tokio::test]
async fn health_is_ok_and_echoes_request_id() {
    let srv = TestServer::spawn(AppServices::stateless(&AppConfig::default())).await;
    let request_id = "0190a6a4-8d3c-7b2a-9f44-1c2d3e4f5a6b";

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .header("x-request-id", request_id)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("x-request-id").unwrap().to_str().unwrap(),
        request_id
    );
}

#[tokio::test]
async fn stateless_forecast_and_reorder() {
    let srv = TestServer::spawn(AppServices::stateless(&AppConfig::default())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/forecast_and_reorder", srv.base_url))
        .json(&json!({
            "product_name": "Blue Widget",
            "sales_history": [4, 5, 9],
            "stock": 4,
            "gain": 1.2
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "product_id": null,
            "product_name": "Blue Widget",
            "next_week": 6,
            "trend": "increasing",
            "action": "reorder",
            "reorder_qty": 7,
            "confidence": 0.9
        })
    );
}

#[tokio::test]
async fn malformed_request_id_is_replaced() {
    let srv = TestServer::spawn(AppServices::stateless(&AppConfig::default())).await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .header("x-request-id", "not-a-uuid")
        .send()
        .await
        .unwrap();

    let echoed = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_ne!(echoed, "not-a-uuid");
    assert!(echoed.parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn stateless_request_parameters_switch_to_lead_time_cover() {
    let srv = TestServer::spawn(AppServices::stateless(&AppConfig::default())).await;

    let res = reqwest::Client::new()
        .post(format!("{}/forecast_and_reorder", srv.base_url))
        .json(&json!({
            "product_name": "Blue Widget",
            "sales_history": [4, 5, 9],
            "stock": 4,
            "lead_time_days": 28,
            "safety_stock": 100
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["action"], "reorder");
    assert_eq!(body["reorder_qty"], 120);
}

#[tokio::test]
async fn stateless_errors_are_json() {
    let srv = TestServer::spawn(AppServices::stateless(&AppConfig::default())).await;
    let client = reqwest::Client::new();
    let url = format!("{}/forecast_and_reorder", srv.base_url);

    let short = client
        .post(&url)
        .json(&json!({ "product_name": "w", "sales_history": [1, 2], "stock": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(short.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = short.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_history");

    let negative = client
        .post(&url)
        .json(&json!({ "product_name": "w", "sales_history": [1, 2, 3], "stock": -4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = negative.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let malformed = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{\"product_name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn persisted_forecast_is_logged_and_listed() {
    let (srv, id) = persisted_server().await;
    let client = reqwest::Client::new();

    // Name lookup; the oldest period (50) falls outside HISTORY_PERIODS=3.
    let res = client
        .post(format!("{}/products/Blue%20Widget/forecast", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["product_id"], id.to_string());
    assert_eq!(body["next_week"], 11);
    assert_eq!(body["trend"], "declining");
    assert_eq!(body["action"], "reorder");
    assert_eq!(body["reorder_qty"], 19);

    // Id lookup hits the same product and appends a second entry.
    let res = client
        .post(format!("{}/products/{}/forecast", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/products/{}/recommendations?limit=5", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["product_name"], "Blue Widget");
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r["reorder_qty"] == 19 && r["confidence"] == 0.9));
}

#[tokio::test]
async fn persisted_lookup_failures() {
    let (srv, _) = persisted_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products/{}/forecast", srv.base_url, ProductId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "product_not_found");

    let stateless = TestServer::spawn(AppServices::stateless(&AppConfig::default())).await;
    let res = client
        .post(format!("{}/products/anything/forecast", stateless.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
