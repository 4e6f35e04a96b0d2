//! Infrastructure layer: configuration, database access, recommendation log.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod recommendation_log;

pub use catalog::{CatalogStore, InMemoryCatalog, PostgresCatalog, ProductRecord, ProductRef};
pub use config::{AppConfig, ConfigError, StatelessStrategy};
pub use error::StoreError;
pub use recommendation_log::{
    InMemoryRecommendationLog, PostgresRecommendationLog, RecommendationEntry, RecommendationLog,
};
