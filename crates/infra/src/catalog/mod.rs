//! Product catalog and sales history (read side of the persisted variant).

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

use serde::{Deserialize, Serialize};

use restock_core::{DomainError, ProductId};
use restock_forecast::{DEFAULT_LEAD_TIME_DAYS, ReorderParameters};

use crate::error::StoreError;

/// How a caller names a product: by id, or by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    Id(ProductId),
    Name(String),
}

impl ProductRef {
    /// UUIDs resolve by id; anything else is treated as a product name.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::invalid_id("product reference cannot be empty"));
        }
        Ok(match raw.parse::<ProductId>() {
            Ok(id) => ProductRef::Id(id),
            Err(_) => ProductRef::Name(raw.to_string()),
        })
    }
}

impl core::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProductRef::Id(id) => core::fmt::Display::fmt(id, f),
            ProductRef::Name(name) => f.write_str(name),
        }
    }
}

/// Product attributes as stored.
///
/// Values are raw database integers; [`ProductRecord::reorder_parameters`] applies
/// defaults and rejects negatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub stock_on_hand: i64,
    pub lead_time_days: Option<i32>,
    pub minimum_order_quantity: Option<i64>,
    pub safety_stock: Option<i64>,
}

impl ProductRecord {
    pub fn new(id: ProductId, name: impl Into<String>, stock_on_hand: i64) -> Self {
        Self {
            id,
            name: name.into(),
            stock_on_hand,
            lead_time_days: None,
            minimum_order_quantity: None,
            safety_stock: None,
        }
    }

    pub fn with_lead_time_days(mut self, days: i32) -> Self {
        self.lead_time_days = Some(days);
        self
    }

    pub fn with_minimum_order_quantity(mut self, moq: i64) -> Self {
        self.minimum_order_quantity = Some(moq);
        self
    }

    pub fn with_safety_stock(mut self, units: i64) -> Self {
        self.safety_stock = Some(units);
        self
    }

    /// Missing values default to lead time 7 days, MOQ 0 and safety stock 0.
    pub fn reorder_parameters(&self) -> Result<ReorderParameters, DomainError> {
        Ok(ReorderParameters {
            stock_on_hand: non_negative("stock_on_hand", self.stock_on_hand)?,
            lead_time_days: match self.lead_time_days {
                Some(days) => u32::try_from(days).map_err(|_| negative("lead_time_days", days))?,
                None => DEFAULT_LEAD_TIME_DAYS,
            },
            minimum_order_quantity: non_negative(
                "minimum_order_quantity",
                self.minimum_order_quantity.unwrap_or(0),
            )?,
            safety_stock: non_negative("safety_stock", self.safety_stock.unwrap_or(0))?,
        })
    }
}

/// Read access to products and their sales history.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Resolve a product; `StoreError::NotFound` if it does not exist.
    async fn find_product(&self, product: &ProductRef) -> Result<ProductRecord, StoreError>;

    /// The most recent `periods` sales figures, oldest first.
    async fn recent_sales(&self, product_id: ProductId, periods: usize)
    -> Result<Vec<u64>, StoreError>;
}

fn non_negative(field: &str, value: i64) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| negative(field, value))
}

fn negative(field: &str, value: impl core::fmt::Display) -> DomainError {
    DomainError::invalid_parameter(format!("{field} must be non-negative, got {value}"))
}

/// Convert stored unit counts, rejecting negative rows.
pub(crate) fn sales_from_units(
    product_id: ProductId,
    units: impl IntoIterator<Item = i64>,
) -> Result<Vec<u64>, StoreError> {
    units
        .into_iter()
        .map(|u| {
            u64::try_from(u).map_err(|_| {
                StoreError::Invalid(DomainError::invalid_parameter(format!(
                    "product {product_id} has a negative sales period ({u})"
                )))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_reference_resolves_by_id() {
        let id = ProductId::new();
        assert_eq!(ProductRef::parse(&id.to_string()).unwrap(), ProductRef::Id(id));
    }

    #[test]
    fn other_references_are_names() {
        assert_eq!(
            ProductRef::parse("  Blue Widget ").unwrap(),
            ProductRef::Name("Blue Widget".to_string())
        );
        assert!(matches!(ProductRef::parse("   "), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn missing_attributes_take_defaults() {
        let params = ProductRecord::new(ProductId::new(), "widget", 12)
            .reorder_parameters()
            .unwrap();
        assert_eq!(params, ReorderParameters::with_stock(12));
        assert_eq!(params.lead_time_days, 7);
    }

    #[test]
    fn stored_attributes_are_used() {
        let params = ProductRecord::new(ProductId::new(), "widget", 5)
            .with_lead_time_days(14)
            .with_minimum_order_quantity(3)
            .with_safety_stock(2)
            .reorder_parameters()
            .unwrap();
        assert_eq!(
            params,
            ReorderParameters::with_stock(5)
                .lead_time_days(14)
                .minimum_order_quantity(3)
                .safety_stock(2)
        );
    }

    #[test]
    fn negative_attributes_are_invalid_parameters() {
        let base = ProductRecord::new(ProductId::new(), "widget", 5);

        let err = ProductRecord { stock_on_hand: -1, ..base.clone() }
            .reorder_parameters()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(msg) if msg.contains("stock_on_hand")));

        let err = base.clone().with_lead_time_days(-7).reorder_parameters().unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(msg) if msg.contains("lead_time_days")));

        let err = base.with_safety_stock(-2).reorder_parameters().unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(msg) if msg.contains("safety_stock")));
    }

    #[test]
    fn negative_sales_rows_are_rejected() {
        let err = sales_from_units(ProductId::new(), [3, -1, 4]).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(DomainError::InvalidParameter(_))));
        assert_eq!(sales_from_units(ProductId::new(), [3, 0, 4]).unwrap(), vec![3, 0, 4]);
    }
}
