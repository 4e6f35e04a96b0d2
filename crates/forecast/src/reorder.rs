use serde::{Deserialize, Serialize};

use restock_core::ValueObject;

use crate::forecaster::ForecastResult;

/// Lead time assumed when a product has none recorded.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

/// Fixed safety margin (units) used by the flat-margin strategy.
pub const DEFAULT_FLAT_MARGIN: u64 = 5;

const DAYS_PER_WEEK: u32 = 7;

/// Inventory inputs for a reorder decision.
///
/// All fields are unsigned: negative values are rejected at the boundary before a
/// `ReorderParameters` can be built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderParameters {
    pub stock_on_hand: u64,
    pub lead_time_days: u32,
    pub minimum_order_quantity: u64,
    pub safety_stock: u64,
}

impl ValueObject for ReorderParameters {}

impl ReorderParameters {
    /// Parameters with only a stock count; everything else takes its default.
    pub fn with_stock(stock_on_hand: u64) -> Self {
        Self {
            stock_on_hand,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            minimum_order_quantity: 0,
            safety_stock: 0,
        }
    }

    pub fn lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn minimum_order_quantity(mut self, moq: u64) -> Self {
        self.minimum_order_quantity = moq;
        self
    }

    pub fn safety_stock(mut self, units: u64) -> Self {
        self.safety_stock = units;
        self
    }

    /// Lead time in whole weeks, rounded to nearest and never below one week.
    pub fn lead_weeks(&self) -> u64 {
        // Integer days / 7 never lands exactly on .5, so half-up rounding is exact.
        let rounded = (self.lead_time_days.saturating_add(DAYS_PER_WEEK / 2)) / DAYS_PER_WEEK;
        u64::from(rounded.max(1))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderAction {
    Reorder,
    DoNothing,
}

impl ReorderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderAction::Reorder => "reorder",
            ReorderAction::DoNothing => "do_nothing",
        }
    }
}

impl core::fmt::Display for ReorderAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ReorderAction {
    type Err = restock_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reorder" => Ok(ReorderAction::Reorder),
            "do_nothing" => Ok(ReorderAction::DoNothing),
            other => Err(restock_core::DomainError::invalid_parameter(format!(
                "unknown reorder action: {other}"
            ))),
        }
    }
}

/// Outcome of the reorder policy.
///
/// Invariant: `quantity == 0` for `DoNothing`, `quantity >= minimum_order_quantity`
/// for `Reorder`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderDecision {
    pub action: ReorderAction,
    pub quantity: u64,
}

impl ValueObject for ReorderDecision {}

impl ReorderDecision {
    fn do_nothing() -> Self {
        Self {
            action: ReorderAction::DoNothing,
            quantity: 0,
        }
    }

    fn reorder(quantity: u64) -> Self {
        Self {
            action: ReorderAction::Reorder,
            quantity,
        }
    }
}

/// How the reorder point and quantity are padded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarginStrategy {
    /// Cover demand for the whole lead time plus safety stock; floor at the MOQ.
    #[default]
    LeadTimeCover,
    /// Single-period cover; add a fixed margin to the shortfall.
    ///
    /// Lead time and safety stock are ignored. The MOQ still floors the quantity;
    /// with the default MOQ of zero this is exactly `forecast - stock + margin`.
    FlatMargin { margin: u64 },
}

/// Reorder decision engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReorderPolicy {
    pub strategy: MarginStrategy,
}

impl ReorderPolicy {
    pub fn new(strategy: MarginStrategy) -> Self {
        Self { strategy }
    }

    pub fn lead_time_cover() -> Self {
        Self::new(MarginStrategy::LeadTimeCover)
    }

    pub fn flat_margin(margin: u64) -> Self {
        Self::new(MarginStrategy::FlatMargin { margin })
    }

    /// Inventory level below which a reorder is triggered.
    pub fn reorder_point(&self, forecast: &ForecastResult, params: &ReorderParameters) -> u64 {
        match self.strategy {
            MarginStrategy::LeadTimeCover => forecast
                .next_period_demand
                .saturating_mul(params.lead_weeks())
                .saturating_add(params.safety_stock),
            MarginStrategy::FlatMargin { .. } => forecast.next_period_demand,
        }
    }

    pub fn decide(&self, forecast: &ForecastResult, params: &ReorderParameters) -> ReorderDecision {
        let reorder_point = self.reorder_point(forecast, params);
        if params.stock_on_hand >= reorder_point {
            return ReorderDecision::do_nothing();
        }

        let gap = reorder_point - params.stock_on_hand;
        let padded = match self.strategy {
            MarginStrategy::LeadTimeCover => gap,
            MarginStrategy::FlatMargin { margin } => gap.saturating_add(margin),
        };

        ReorderDecision::reorder(padded.max(params.minimum_order_quantity))
    }
}

/// Decide with the lead-time-cover strategy.
pub fn decide(forecast: &ForecastResult, params: &ReorderParameters) -> ReorderDecision {
    ReorderPolicy::lead_time_cover().decide(forecast, params)
}
