//! Postgres-backed recommendation log.
//!
//! Only `INSERT` and `SELECT` are issued; the schema additionally rejects
//! updates and deletes with a trigger.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use restock_core::{DomainError, ProductId, RecommendationId};

use super::{RecommendationEntry, RecommendationLog};
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresRecommendationLog {
    pool: PgPool,
}

impl PostgresRecommendationLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_db_units(field: &str, value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| {
        StoreError::Invalid(DomainError::invalid_parameter(format!(
            "{field} {value} exceeds the storable range"
        )))
    })
}

fn from_db_units(field: &str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| {
        StoreError::Storage(format!("stored {field} is negative ({value})"))
    })
}

fn entry_from_row(row: &sqlx::postgres::PgRow) -> Result<RecommendationEntry, StoreError> {
    let get_err = |e| map_sqlx_error("list_recommendations", e);

    let trend: String = row.try_get("trend").map_err(get_err)?;
    let action: String = row.try_get("action").map_err(get_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(get_err)?;

    Ok(RecommendationEntry {
        id: RecommendationId::from_uuid(row.try_get("id").map_err(get_err)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(get_err)?),
        next_week: from_db_units("next_week", row.try_get("next_week").map_err(get_err)?)?,
        trend: trend
            .parse()
            .map_err(|e: DomainError| StoreError::Storage(e.to_string()))?,
        action: action
            .parse()
            .map_err(|e: DomainError| StoreError::Storage(e.to_string()))?,
        reorder_qty: from_db_units("reorder_qty", row.try_get("reorder_qty").map_err(get_err)?)?,
        confidence: row.try_get("confidence").map_err(get_err)?,
        created_at,
    })
}

#[async_trait::async_trait]
impl RecommendationLog for PostgresRecommendationLog {
    #[instrument(
        skip(self, entry),
        fields(product_id = %entry.product_id, recommendation_id = %entry.id),
        err
    )]
    async fn append(&self, entry: &RecommendationEntry) -> Result<(), StoreError> {
        let next_week = to_db_units("next_week", entry.next_week)?;
        let reorder_qty = to_db_units("reorder_qty", entry.reorder_qty)?;

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("append_recommendation", e))?;

        sqlx::query(
            r#"
            INSERT INTO recommendations (
                id,
                product_id,
                next_week,
                trend,
                action,
                reorder_qty,
                confidence,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.product_id.as_uuid())
        .bind(next_week)
        .bind(entry.trend.as_str())
        .bind(entry.action.as_str())
        .bind(reorder_qty)
        .bind(entry.confidence)
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("append_recommendation", e))?;

        Ok(())
    }

    #[instrument(skip(self, product_id), fields(product_id = %product_id), err)]
    async fn list_for_product(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<RecommendationEntry>, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("list_recommendations", e))?;

        let rows = sqlx::query(
            r#"
            SELECT
                id,
                product_id,
                next_week,
                trend,
                action,
                reorder_qty,
                confidence,
                created_at
            FROM recommendations
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("list_recommendations", e))?;

        rows.iter().map(entry_from_row).collect()
    }
}
