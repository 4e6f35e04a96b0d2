//! `restock-forecast`
//!
//! **Responsibility:** the forecast-and-reorder decision engine.
//!
//! This crate is intentionally pure:
//! - no IO, no storage, no HTTP, no logging side effects;
//! - every function is total on validated input;
//! - inputs are provided by callers (the API orchestrator, tests, benches).

pub mod engine;
pub mod forecaster;
pub mod reorder;

pub use engine::{PLACEHOLDER_CONFIDENCE, Recommendation, ReplenishmentEngine};
pub use forecaster::{
    DEFAULT_BUFFER_RATIO, DEFAULT_WINDOW_SIZE, ForecastResult, Forecaster, Trend, forecast,
};
pub use reorder::{
    DEFAULT_FLAT_MARGIN, DEFAULT_LEAD_TIME_DAYS, MarginStrategy, ReorderAction, ReorderDecision,
    ReorderParameters, ReorderPolicy, decide,
};
pub use restock_core::{DomainError, DomainResult};
