//! Value object trait: equality by value, not identity.
//!
//! Forecasts, reorder parameters and decisions are value objects: they carry no
//! identity, are created once per computation and never mutated afterwards.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two forecasts with the
/// same demand and trend are the same forecast, regardless of which request
/// produced them.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ForecastResult {
///     next_period_demand: u64,
///     trend: Trend,
/// }
///
/// impl ValueObject for ForecastResult {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
