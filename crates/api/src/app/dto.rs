use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restock_core::{DomainError, ProductId, RecommendationId};
use restock_forecast::{DEFAULT_LEAD_TIME_DAYS, Recommendation, ReorderAction, ReorderParameters, Trend};
use restock_infra::RecommendationEntry;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;

// -------------------------
// Request DTOs
// -------------------------

/// Body of the stateless endpoint.
///
/// Numeric fields are signed so negative input reaches validation and gets a
/// descriptive error instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub product_name: String,
    pub sales_history: Vec<i64>,
    pub stock: i64,
    /// Accepted for compatibility with older clients; not used by the engine.
    #[serde(default)]
    pub gain: Option<f64>,
    #[serde(default)]
    pub lead_time_days: Option<i64>,
    #[serde(default)]
    pub minimum_order_quantity: Option<i64>,
    #[serde(default)]
    pub safety_stock: Option<i64>,
}

impl ForecastRequest {
    pub fn sales(&self) -> Result<Vec<u64>, DomainError> {
        self.sales_history
            .iter()
            .enumerate()
            .map(|(i, &units)| {
                u64::try_from(units).map_err(|_| {
                    DomainError::invalid_parameter(format!(
                        "sales_history[{i}] must be non-negative, got {units}"
                    ))
                })
            })
            .collect()
    }

    /// Whether the caller sent any of lead time, MOQ or safety stock.
    pub fn has_replenishment_parameters(&self) -> bool {
        self.lead_time_days.is_some()
            || self.minimum_order_quantity.is_some()
            || self.safety_stock.is_some()
    }

    pub fn reorder_parameters(&self) -> Result<ReorderParameters, DomainError> {
        let lead_time_days = match self.lead_time_days {
            Some(days) => u32::try_from(days).map_err(|_| {
                DomainError::invalid_parameter(format!(
                    "lead_time_days must be between 0 and {}, got {days}",
                    u32::MAX
                ))
            })?,
            None => DEFAULT_LEAD_TIME_DAYS,
        };

        Ok(ReorderParameters {
            stock_on_hand: non_negative("stock", self.stock)?,
            lead_time_days,
            minimum_order_quantity: non_negative(
                "minimum_order_quantity",
                self.minimum_order_quantity.unwrap_or(0),
            )?,
            safety_stock: non_negative("safety_stock", self.safety_stock.unwrap_or(0))?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

fn non_negative(field: &str, value: i64) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| {
        DomainError::invalid_parameter(format!("{field} must be non-negative, got {value}"))
    })
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// `None` for the stateless endpoint.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub next_week: u64,
    pub trend: Trend,
    pub action: ReorderAction,
    pub reorder_qty: u64,
    pub confidence: f64,
}

impl ForecastResponse {
    pub fn new(product_id: Option<ProductId>, product_name: String, rec: &Recommendation) -> Self {
        Self {
            product_id,
            product_name,
            next_week: rec.forecast.next_period_demand,
            trend: rec.forecast.trend,
            action: rec.decision.action,
            reorder_qty: rec.decision.quantity,
            confidence: rec.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub id: RecommendationId,
    pub next_week: u64,
    pub trend: Trend,
    pub action: ReorderAction,
    pub reorder_qty: u64,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl From<RecommendationEntry> for RecommendationView {
    fn from(e: RecommendationEntry) -> Self {
        Self {
            id: e.id,
            next_week: e.next_week,
            trend: e.trend,
            action: e.action,
            reorder_qty: e.reorder_qty,
            confidence: e.confidence,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationHistoryResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub recommendations: Vec<RecommendationView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(stock: i64, sales: Vec<i64>) -> ForecastRequest {
        ForecastRequest {
            product_name: "widget".to_string(),
            sales_history: sales,
            stock,
            gain: None,
            lead_time_days: None,
            minimum_order_quantity: None,
            safety_stock: None,
        }
    }

    #[test]
    fn absent_parameters_take_defaults() {
        let params = request(8, vec![4, 5, 9]).reorder_parameters().unwrap();
        assert_eq!(params, ReorderParameters::with_stock(8));
    }

    #[test]
    fn replenishment_parameters_are_detected() {
        assert!(!request(8, vec![4, 5, 9]).has_replenishment_parameters());

        let mut req = request(8, vec![4, 5, 9]);
        req.safety_stock = Some(0);
        assert!(req.has_replenishment_parameters());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let err = request(-1, vec![]).reorder_parameters().unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(msg) if msg.contains("stock")));
    }

    #[test]
    fn negative_lead_time_is_rejected() {
        let mut req = request(1, vec![]);
        req.lead_time_days = Some(-3);
        assert!(req.reorder_parameters().is_err());
    }

    #[test]
    fn negative_sales_point_names_its_index() {
        let err = request(1, vec![3, -2]).sales().unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(msg) if msg.contains("sales_history[1]")));
    }

    #[test]
    fn history_limit_is_clamped() {
        assert_eq!(HistoryQuery::default().limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(HistoryQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(HistoryQuery { limit: Some(10_000) }.limit(), MAX_HISTORY_LIMIT);
    }
}
