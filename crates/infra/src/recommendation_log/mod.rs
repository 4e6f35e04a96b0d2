//! Append-only log of computed recommendations (audit/history).
//!
//! Entries are never updated or deleted; there is no API for it.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryRecommendationLog;
pub use postgres::PostgresRecommendationLog;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restock_core::{ProductId, RecommendationId};
use restock_forecast::{Recommendation, ReorderAction, Trend};

use crate::error::StoreError;

/// One logged recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub id: RecommendationId,
    pub product_id: ProductId,
    pub next_week: u64,
    pub trend: Trend,
    pub action: ReorderAction,
    pub reorder_qty: u64,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl RecommendationEntry {
    pub fn new(product_id: ProductId, rec: &Recommendation, created_at: DateTime<Utc>) -> Self {
        Self {
            id: RecommendationId::new(),
            product_id,
            next_week: rec.forecast.next_period_demand,
            trend: rec.forecast.trend,
            action: rec.decision.action,
            reorder_qty: rec.decision.quantity,
            confidence: rec.confidence,
            created_at,
        }
    }
}

#[async_trait::async_trait]
pub trait RecommendationLog: Send + Sync {
    async fn append(&self, entry: &RecommendationEntry) -> Result<(), StoreError>;

    /// Entries for one product, newest first, at most `limit`.
    async fn list_for_product(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<RecommendationEntry>, StoreError>;
}
