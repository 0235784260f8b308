//! Discounting at the technical (valuation) rate

use serde::{Deserialize, Serialize};

/// Annual technical rate compounded over fractional years
///
/// A payment `m` months from inception is discounted by `(1 + i)^(-m/12)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDiscount {
    /// Annual technical interest rate as a fraction
    pub annual_rate: f64,
}

impl TechnicalDiscount {
    pub fn new(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// One-month discount factor `(1 + i)^(-1/12)`
    pub fn monthly_factor(&self) -> f64 {
        self.factor_at(1)
    }

    /// Discount factor from inception to `month` months later
    pub fn factor_at(&self, month: u32) -> f64 {
        (1.0 + self.annual_rate).powf(-(month as f64) / 12.0)
    }

    /// PV of benefits paid at the end of the month of death
    ///
    /// `probs[k]` and `amounts[k]` belong to month `k + 1`; the caller
    /// guarantees equal lengths.
    pub fn pv_end_of_month_benefits(&self, probs: &[f64], amounts: &[f64]) -> f64 {
        probs
            .iter()
            .zip(amounts)
            .enumerate()
            .map(|(k, (p, b))| self.factor_at(k as u32 + 1) * p * b)
            .sum()
    }

    /// PV of a unit paid at the start of each month, weighted by `weights`
    ///
    /// `weights[k]` belongs to the payment at time `k` months.
    pub fn pv_start_of_month_payments(&self, weights: &[f64]) -> f64 {
        weights
            .iter()
            .enumerate()
            .map(|(k, w)| self.factor_at(k as u32) * w)
            .sum()
    }
}

impl Default for TechnicalDiscount {
    fn default() -> Self {
        Self::new(0.0)
    }
}
