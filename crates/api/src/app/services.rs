//! Request orchestration: collect inputs, run the engine, shape and log results.

use std::sync::Arc;

use chrono::Utc;

use restock_forecast::ReplenishmentEngine;
use restock_infra::{
    AppConfig, CatalogStore, PostgresCatalog, PostgresRecommendationLog, ProductRef,
    RecommendationEntry, RecommendationLog, StoreError, db,
};

use crate::app::dto::{ForecastRequest, ForecastResponse, RecommendationHistoryResponse};
use crate::app::errors::ApiError;

/// Stores backing the persisted variant.
#[derive(Clone)]
pub struct Persistence {
    pub catalog: Arc<dyn CatalogStore>,
    pub log: Arc<dyn RecommendationLog>,
}

#[derive(Clone)]
pub struct AppServices {
    stateless_engine: ReplenishmentEngine,
    stateless_cover_engine: ReplenishmentEngine,
    persisted_engine: ReplenishmentEngine,
    history_periods: usize,
    persistence: Option<Persistence>,
}

impl AppServices {
    /// Services without a catalog: only the stateless endpoint works.
    pub fn stateless(config: &AppConfig) -> Self {
        Self {
            stateless_engine: config.stateless_engine(),
            stateless_cover_engine: config.stateless_cover_engine(),
            persisted_engine: config.persisted_engine(),
            history_periods: config.history_periods,
            persistence: None,
        }
    }

    pub fn with_persistence(
        config: &AppConfig,
        catalog: Arc<dyn CatalogStore>,
        log: Arc<dyn RecommendationLog>,
    ) -> Self {
        Self {
            persistence: Some(Persistence { catalog, log }),
            ..Self::stateless(config)
        }
    }

    /// Wire services from configuration; connects to Postgres when `DATABASE_URL` is set.
    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let Some(database_url) = config.database_url.as_deref() else {
            return Ok(Self::stateless(&config));
        };

        let pool = db::connect(database_url, config.max_connections).await?;
        db::migrate(&pool).await?;
        tracing::info!("connected to Postgres; persisted forecasts enabled");

        let catalog: Arc<dyn CatalogStore> = Arc::new(PostgresCatalog::new(pool.clone()));
        let log: Arc<dyn RecommendationLog> = Arc::new(PostgresRecommendationLog::new(pool));
        Ok(Self::with_persistence(&config, catalog, log))
    }

    fn persistence(&self) -> Result<&Persistence, ApiError> {
        self.persistence.as_ref().ok_or(ApiError::PersistenceDisabled)
    }

    /// Stateless variant: the caller supplies the history and stock parameters.
    pub fn forecast_stateless(&self, req: ForecastRequest) -> Result<ForecastResponse, ApiError> {
        if req.product_name.trim().is_empty() {
            return Err(ApiError::Validation("product_name cannot be empty".to_string()));
        }
        let sales = req.sales()?;
        let params = req.reorder_parameters()?;

        // Caller-supplied lead time, MOQ or safety stock always take effect.
        let engine = if req.has_replenishment_parameters() {
            &self.stateless_cover_engine
        } else {
            &self.stateless_engine
        };
        let rec = engine.recommend(&sales, &params)?;

        tracing::info!(
            product_name = %req.product_name,
            periods = sales.len(),
            next_week = rec.forecast.next_period_demand,
            action = %rec.decision.action,
            reorder_qty = rec.decision.quantity,
            "stateless recommendation computed"
        );

        Ok(ForecastResponse::new(None, req.product_name, &rec))
    }

    /// Persisted variant: look the product up, forecast from stored history, log the result.
    pub async fn forecast_product(&self, product: &ProductRef) -> Result<ForecastResponse, ApiError> {
        let persistence = self.persistence()?;

        let record = persistence.catalog.find_product(product).await?;
        let params = record.reorder_parameters().map_err(StoreError::Invalid)?;
        let sales = persistence
            .catalog
            .recent_sales(record.id, self.history_periods)
            .await?;

        let rec = self.persisted_engine.recommend(&sales, &params)?;

        let entry = RecommendationEntry::new(record.id, &rec, Utc::now());
        persistence.log.append(&entry).await?;

        tracing::info!(
            product_id = %record.id,
            recommendation_id = %entry.id,
            periods = sales.len(),
            next_week = rec.forecast.next_period_demand,
            action = %rec.decision.action,
            reorder_qty = rec.decision.quantity,
            "recommendation logged"
        );

        Ok(ForecastResponse::new(Some(record.id), record.name, &rec))
    }

    pub async fn recommendation_history(
        &self,
        product: &ProductRef,
        limit: usize,
    ) -> Result<RecommendationHistoryResponse, ApiError> {
        let persistence = self.persistence()?;

        let record = persistence.catalog.find_product(product).await?;
        let entries = persistence.log.list_for_product(record.id, limit).await?;

        Ok(RecommendationHistoryResponse {
            product_id: record.id,
            product_name: record.name,
            recommendations: entries.into_iter().map(Into::into).collect(),
        })
    }
}
