//! Postgres-backed catalog.
//!
//! Each call acquires one pooled connection for its own scope; the connection
//! returns to the pool when the call finishes, on success or error.

use sqlx::{PgPool, Row};
use tracing::instrument;

use restock_core::ProductId;

use super::{CatalogStore, ProductRecord, ProductRef, sales_from_units};
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_BY_ID: &str = r#"
    SELECT id, name, stock_on_hand, lead_time_days, minimum_order_quantity, safety_stock
    FROM products
    WHERE id = $1
"#;

const SELECT_BY_NAME: &str = r#"
    SELECT id, name, stock_on_hand, lead_time_days, minimum_order_quantity, safety_stock
    FROM products
    WHERE name = $1
"#;

fn product_from_row(row: &sqlx::postgres::PgRow) -> Result<ProductRecord, sqlx::Error> {
    Ok(ProductRecord {
        id: ProductId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        stock_on_hand: row.try_get("stock_on_hand")?,
        lead_time_days: row.try_get("lead_time_days")?,
        minimum_order_quantity: row.try_get("minimum_order_quantity")?,
        safety_stock: row.try_get("safety_stock")?,
    })
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalog {
    #[instrument(skip(self, product), fields(product = %product), err)]
    async fn find_product(&self, product: &ProductRef) -> Result<ProductRecord, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("find_product", e))?;

        let row = match product {
            ProductRef::Id(id) => {
                sqlx::query(SELECT_BY_ID)
                    .bind(id.as_uuid())
                    .fetch_optional(&mut *conn)
                    .await
            }
            ProductRef::Name(name) => {
                sqlx::query(SELECT_BY_NAME)
                    .bind(name)
                    .fetch_optional(&mut *conn)
                    .await
            }
        }
        .map_err(|e| map_sqlx_error("find_product", e))?;

        let row = row.ok_or(StoreError::NotFound)?;
        product_from_row(&row).map_err(|e| map_sqlx_error("find_product", e))
    }

    #[instrument(
        skip(self, product_id),
        fields(product_id = %product_id, rows = tracing::field::Empty),
        err
    )]
    async fn recent_sales(
        &self,
        product_id: ProductId,
        periods: usize,
    ) -> Result<Vec<u64>, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("recent_sales", e))?;

        let rows = sqlx::query(
            r#"
            SELECT units
            FROM (
                SELECT period_start, units
                FROM sales_periods
                WHERE product_id = $1
                ORDER BY period_start DESC
                LIMIT $2
            ) recent
            ORDER BY period_start ASC
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(i64::try_from(periods).unwrap_or(i64::MAX))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("recent_sales", e))?;

        let units = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("units"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("recent_sales", e))?;

        tracing::Span::current().record("rows", units.len());
        sales_from_units(product_id, units)
    }
}
