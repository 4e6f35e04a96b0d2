//! Configuration loading and representation.
//!
//! Values come from environment variables. Parsing is a pure function over a
//! lookup closure so tests never touch the process environment.

use std::str::FromStr;

use thiserror::Error;

use restock_forecast::{
    DEFAULT_BUFFER_RATIO, DEFAULT_FLAT_MARGIN, DEFAULT_WINDOW_SIZE, Forecaster, ReorderPolicy,
    ReplenishmentEngine,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_HISTORY_PERIODS: usize = 12;
pub const DEFAULT_MIN_HISTORY: usize = 3;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Reorder strategy used by the stateless endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatelessStrategy {
    FlatMargin,
    LeadTimeCover,
}

impl FromStr for StatelessStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat_margin" => Ok(StatelessStrategy::FlatMargin),
            "lead_time_cover" => Ok(StatelessStrategy::LeadTimeCover),
            _ => Err("expected one of: flat_margin, lead_time_cover".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Enables the persisted variant when set.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Number of most recent periods fetched for the persisted variant.
    pub history_periods: usize,
    pub forecast_window: usize,
    pub buffer_ratio: f64,
    pub stateless_strategy: StatelessStrategy,
    pub flat_margin: u64,
    /// Minimum history for the stateless endpoint; 0 disables the check.
    pub min_history: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            history_periods: DEFAULT_HISTORY_PERIODS,
            forecast_window: DEFAULT_WINDOW_SIZE,
            buffer_ratio: DEFAULT_BUFFER_RATIO,
            stateless_strategy: StatelessStrategy::FlatMargin,
            flat_margin: DEFAULT_FLAT_MARGIN,
            min_history: DEFAULT_MIN_HISTORY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let history_periods = parse_or(&lookup, "HISTORY_PERIODS", defaults.history_periods)?;
        if history_periods == 0 {
            return Err(ConfigError {
                key: "HISTORY_PERIODS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let forecast_window = parse_or(&lookup, "FORECAST_WINDOW", defaults.forecast_window)?;
        if forecast_window == 0 {
            return Err(ConfigError {
                key: "FORECAST_WINDOW",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let buffer_ratio: f64 = parse_or(&lookup, "FORECAST_BUFFER_RATIO", defaults.buffer_ratio)?;
        if !(buffer_ratio.is_finite() && buffer_ratio >= 0.0) {
            return Err(ConfigError {
                key: "FORECAST_BUFFER_RATIO",
                value: buffer_ratio.to_string(),
                reason: "must be a finite non-negative number".to_string(),
            });
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            history_periods,
            forecast_window,
            buffer_ratio,
            stateless_strategy: parse_or(&lookup, "STATELESS_STRATEGY", defaults.stateless_strategy)?,
            flat_margin: parse_or(&lookup, "FLAT_MARGIN", defaults.flat_margin)?,
            min_history: parse_or(&lookup, "MIN_HISTORY", defaults.min_history)?,
        })
    }

    fn forecaster(&self) -> Forecaster {
        Forecaster::new(self.forecast_window, self.buffer_ratio)
    }

    /// Engine behind the stateless endpoint.
    pub fn stateless_engine(&self) -> ReplenishmentEngine {
        let policy = match self.stateless_strategy {
            StatelessStrategy::FlatMargin => ReorderPolicy::flat_margin(self.flat_margin),
            StatelessStrategy::LeadTimeCover => ReorderPolicy::lead_time_cover(),
        };
        ReplenishmentEngine::new(self.forecaster(), policy).with_min_history(Some(self.min_history))
    }

    /// Stateless engine used when the request carries its own replenishment
    /// parameters: always lead-time cover, same minimum history.
    pub fn stateless_cover_engine(&self) -> ReplenishmentEngine {
        ReplenishmentEngine::new(self.forecaster(), ReorderPolicy::lead_time_cover())
            .with_min_history(Some(self.min_history))
    }

    /// Engine behind the persisted endpoint: tolerant of short series.
    pub fn persisted_engine(&self) -> ReplenishmentEngine {
        ReplenishmentEngine::new(self.forecaster(), ReorderPolicy::lead_time_cover())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
