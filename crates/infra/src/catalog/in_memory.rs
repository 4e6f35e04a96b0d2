use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use restock_core::ProductId;

use super::{CatalogStore, ProductRecord, ProductRef, sales_from_units};
use crate::error::StoreError;

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, ProductRecord>>,
    sales: RwLock<HashMap<ProductId, BTreeMap<NaiveDate, i64>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Insert or replace a product.
    pub fn upsert_product(&self, product: ProductRecord) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(|_| StoreError::poisoned())?;
        products.insert(product.id, product);
        Ok(())
    }

    /// Record the units sold in the period starting at `period_start`.
    ///
    /// Recording the same period twice replaces the earlier figure.
    pub fn record_sales(
        &self,
        product_id: ProductId,
        period_start: NaiveDate,
        units: i64,
    ) -> Result<(), StoreError> {
        if !self
            .products
            .read()
            .map_err(|_| StoreError::poisoned())?
            .contains_key(&product_id)
        {
            return Err(StoreError::NotFound);
        }

        let mut sales = self.sales.write().map_err(|_| StoreError::poisoned())?;
        sales.entry(product_id).or_default().insert(period_start, units);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_product(&self, product: &ProductRef) -> Result<ProductRecord, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::poisoned())?;
        let found = match product {
            ProductRef::Id(id) => products.get(id),
            ProductRef::Name(name) => products.values().find(|p| &p.name == name),
        };
        found.cloned().ok_or(StoreError::NotFound)
    }

    async fn recent_sales(
        &self,
        product_id: ProductId,
        periods: usize,
    ) -> Result<Vec<u64>, StoreError> {
        let sales = self.sales.read().map_err(|_| StoreError::poisoned())?;
        let Some(history) = sales.get(&product_id) else {
            return Ok(Vec::new());
        };

        let skip = history.len().saturating_sub(periods);
        sales_from_units(product_id, history.values().skip(skip).copied())
    }
}
