use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult};

use crate::forecaster::{ForecastResult, Forecaster};
use crate::reorder::{DEFAULT_FLAT_MARGIN, ReorderDecision, ReorderParameters, ReorderPolicy};

/// Confidence reported with every recommendation.
///
/// Placeholder until a fitted model exists; nothing computes this value.
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.9;

/// Minimum history required by the minimal engine.
pub const MINIMAL_HISTORY_PERIODS: usize = 3;

/// Forecast plus reorder decision for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub forecast: ForecastResult,
    pub decision: ReorderDecision,
    pub confidence: f64,
}

/// Forecaster and reorder policy wired in sequence.
///
/// The two historical variants are presets of this one engine:
/// - [`ReplenishmentEngine::minimal`]: flat +5 margin, rejects series shorter than 3.
/// - [`ReplenishmentEngine::lead_time_cover`]: lead time / MOQ / safety stock,
///   tolerates short series by shrinking the window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReplenishmentEngine {
    forecaster: Forecaster,
    policy: ReorderPolicy,
    min_history: Option<usize>,
}

impl Default for ReplenishmentEngine {
    fn default() -> Self {
        Self::lead_time_cover()
    }
}

impl ReplenishmentEngine {
    pub fn new(forecaster: Forecaster, policy: ReorderPolicy) -> Self {
        Self {
            forecaster,
            policy,
            min_history: None,
        }
    }

    pub fn minimal() -> Self {
        Self::new(Forecaster::default(), ReorderPolicy::flat_margin(DEFAULT_FLAT_MARGIN))
            .with_min_history(Some(MINIMAL_HISTORY_PERIODS))
    }

    pub fn lead_time_cover() -> Self {
        Self::new(Forecaster::default(), ReorderPolicy::lead_time_cover())
    }

    /// `None` (or `Some(0)`) accepts any series length.
    pub fn with_min_history(mut self, min_history: Option<usize>) -> Self {
        self.min_history = min_history.filter(|&n| n > 0);
        self
    }

    pub fn forecaster(&self) -> &Forecaster {
        &self.forecaster
    }

    pub fn policy(&self) -> &ReorderPolicy {
        &self.policy
    }

    pub fn min_history(&self) -> Option<usize> {
        self.min_history
    }

    /// Forecast next-period demand and decide whether to reorder.
    ///
    /// The only failure is `InsufficientHistory`, and only when a minimum history
    /// is configured.
    pub fn recommend(
        &self,
        sales: &[u64],
        params: &ReorderParameters,
    ) -> DomainResult<Recommendation> {
        match self.min_history {
            Some(required) if sales.len() < required => {
                return Err(DomainError::insufficient_history(required, sales.len()));
            }
            _ => {}
        }

        let forecast = self.forecaster.forecast(sales);
        let decision = self.policy.decide(&forecast, params);

        Ok(Recommendation {
            forecast,
            decision,
            confidence: PLACEHOLDER_CONFIDENCE,
        })
    }
}
