//! Loan parameters as entered by the borrower

use serde::{Deserialize, Serialize};

use crate::error::{LoanCoverError, LoanCoverResult};

/// Longest accepted loan term
pub const MAX_TERM_YEARS: u32 = 100;

/// Principal, term and nominal annual rate of a fixed-rate loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed
    pub principal: f64,

    /// Loan term in whole years
    pub term_years: u32,

    /// Nominal annual rate as a fraction (0.035 for 3.5%)
    pub annual_rate: f64,
}

impl LoanParameters {
    pub fn new(principal: f64, term_years: u32, annual_rate: f64) -> Self {
        Self {
            principal,
            term_years,
            annual_rate,
        }
    }

    /// Reject non-positive principal, zero or oversized terms and negative rates
    pub fn validate(&self) -> LoanCoverResult<()> {
        if !(self.principal.is_finite() && self.principal > 0.0) {
            return Err(LoanCoverError::invalid_input(
                "principal",
                format!("must be > 0, got {}", self.principal),
            ));
        }
        if self.term_years == 0 {
            return Err(LoanCoverError::invalid_input("term_years", "must be > 0"));
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(LoanCoverError::invalid_input(
                "term_years",
                format!("must be <= {}, got {}", MAX_TERM_YEARS, self.term_years),
            ));
        }
        if !(self.annual_rate.is_finite() && self.annual_rate >= 0.0) {
            return Err(LoanCoverError::invalid_input(
                "annual_rate",
                format!("must be >= 0, got {}", self.annual_rate),
            ));
        }
        Ok(())
    }

    /// Number of monthly instalments (saturates for terms `validate` rejects)
    pub fn month_count(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }
}
