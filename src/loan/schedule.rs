//! Constant-payment amortization schedule
//!
//! The monthly payment is rounded to cents once and reused for every row.
//! The last row absorbs the rounding drift so the balance ends at exactly zero.

use log::debug;
use serde::{Deserialize, Serialize};

use super::params::LoanParameters;
use crate::error::LoanCoverResult;

/// Monthly rates below this magnitude are treated as zero
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Round a currency amount to two decimals
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Level monthly payment rounded to cents
///
/// `principal * i / (1 - (1 + i)^-n)` with `i = annual_rate / 12`, or
/// `principal / n` when the rate is zero.
pub fn monthly_payment(principal: f64, month_count: u32, annual_rate: f64) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let n = month_count as f64;

    let payment = if monthly_rate.abs() < ZERO_RATE_EPSILON {
        principal / n
    } else {
        principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-n))
    };

    round_cents(payment)
}

/// One month of the schedule, amounts rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month index (1-indexed, 0 only for the opening presentation row)
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Remaining balance (CRD) at the end of the month
    pub balance: f64,
}

impl AmortizationRow {
    /// Share of the payment going to interest, in percent
    pub fn interest_share_pct(&self) -> f64 {
        if self.payment == 0.0 {
            0.0
        } else {
            round_cents(self.interest / self.payment * 100.0)
        }
    }
}

/// Full amortization table with its derived totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub loan: LoanParameters,

    /// Level payment used for every row but possibly the last
    pub payment: f64,

    /// Sum of the interest column
    pub total_interest: f64,

    /// Sum of payments minus the principal
    pub total_cost: f64,

    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    /// Build the month-by-month schedule for a loan
    pub fn compute(loan: &LoanParameters) -> LoanCoverResult<Self> {
        loan.validate()?;

        let month_count = loan.month_count();
        let monthly_rate = loan.monthly_rate();
        let payment = monthly_payment(loan.principal, month_count, loan.annual_rate);

        debug!(
            "Amortizing {:.2} over {} months at {:.6} monthly: payment {:.2}",
            loan.principal, month_count, monthly_rate, payment
        );

        let mut rows = Vec::with_capacity(month_count as usize);
        let mut balance = loan.principal;

        for month in 1..=month_count {
            let interest = balance * monthly_rate;

            let (row_payment, principal, next_balance) = if month == month_count {
                // Final month clears whatever is left
                (interest + balance, balance, 0.0)
            } else {
                let principal = payment - interest;
                (payment, principal, balance - principal)
            };

            rows.push(AmortizationRow {
                month,
                payment: round_cents(row_payment),
                interest: round_cents(interest),
                principal: round_cents(principal),
                balance: round_cents(next_balance),
            });

            balance = next_balance;
        }

        let total_interest = round_cents(rows.iter().map(|r| r.interest).sum::<f64>());
        let total_paid: f64 = rows.iter().map(|r| r.payment).sum();
        let total_cost = round_cents(total_paid - loan.principal);

        Ok(Self {
            loan: *loan,
            payment,
            total_interest,
            total_cost,
            rows,
        })
    }

    /// Shorthand for [`AmortizationSchedule::compute`]
    pub fn for_loan(principal: f64, term_years: u32, annual_rate: f64) -> LoanCoverResult<Self> {
        Self::compute(&LoanParameters::new(principal, term_years, annual_rate))
    }

    pub fn month_count(&self) -> usize {
        self.rows.len()
    }

    /// End-of-month remaining balances, month 1 first
    pub fn monthly_balances(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.balance).collect()
    }

    /// Rows preceded by a month-0 line holding the initial principal
    pub fn rows_with_opening(&self) -> Vec<AmortizationRow> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(AmortizationRow {
            month: 0,
            payment: 0.0,
            interest: 0.0,
            principal: 0.0,
            balance: self.loan.principal,
        });
        rows.extend_from_slice(&self.rows);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanCoverError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_mortgage() {
        let schedule = AmortizationSchedule::for_loan(200_000.0, 20, 0.035).unwrap();

        assert_eq!(schedule.payment, 1159.92);
        assert_eq!(schedule.month_count(), 240);
        assert_eq!(schedule.rows.last().unwrap().balance, 0.0);

        let first = schedule.rows[0];
        assert_eq!(first.month, 1);
        assert_abs_diff_eq!(first.interest, 583.33, epsilon = 1e-9);
        assert_abs_diff_eq!(first.principal, 576.59, epsilon = 1e-9);
        assert_abs_diff_eq!(first.balance, 199_423.41, epsilon = 1e-9);

        // Last row pays only what is left
        let last = schedule.rows[239];
        assert_abs_diff_eq!(last.payment, 1159.72, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.total_interest, 78_380.64, epsilon = 1e-6);
        assert_abs_diff_eq!(schedule.total_cost, 78_380.60, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_rate_loan() {
        let schedule = AmortizationSchedule::for_loan(100_000.0, 10, 0.0).unwrap();

        assert_eq!(schedule.payment, 833.33);
        assert_eq!(schedule.month_count(), 120);
        assert_eq!(schedule.total_interest, 0.0);
        assert!(schedule.total_cost.abs() <= 0.02);

        let last = schedule.rows.last().unwrap();
        assert_abs_diff_eq!(last.payment, 833.73, epsilon = 1e-6);
        assert_eq!(last.balance, 0.0);
    }

    #[test]
    fn test_principal_repaid_and_balance_monotone() {
        for &(principal, years, rate) in &[
            (200_000.0, 20, 0.035),
            (10_000.0, 1, 0.12),
            (55_555.55, 7, 0.0199),
            (1_000.0, 1, 0.0),
            (350_000.0, 30, 0.08),
        ] {
            let schedule = AmortizationSchedule::for_loan(principal, years, rate).unwrap();
            let rows = &schedule.rows;

            assert_eq!(rows.last().unwrap().balance, 0.0);

            let repaid: f64 = rows.iter().map(|r| r.principal).sum();
            let tolerance = 0.01 * rows.len() as f64;
            assert!(
                (repaid - principal).abs() <= tolerance,
                "repaid {} vs principal {}",
                repaid,
                principal
            );

            let mut prior = principal;
            for row in rows {
                assert!(row.balance <= prior, "balance rose at month {}", row.month);
                prior = row.balance;
            }

            // Same payment on every row except the last
            assert!(rows[..rows.len() - 1].iter().all(|r| r.payment == schedule.payment));
            assert!((schedule.total_cost - schedule.total_interest).abs() < 0.5);
        }
    }

    #[test]
    fn test_interest_is_prior_balance_times_rate() {
        let schedule = AmortizationSchedule::for_loan(10_000.0, 1, 0.12).unwrap();
        assert_eq!(schedule.payment, 888.49);

        let mut prior = 10_000.0;
        for row in &schedule.rows {
            assert!((row.interest - prior * 0.01).abs() <= 0.01);
            prior = row.balance;
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let err = AmortizationSchedule::for_loan(0.0, 20, 0.035).unwrap_err();
        assert!(matches!(err, LoanCoverError::InvalidInput { ref field, .. } if field == "principal"));

        let err = AmortizationSchedule::for_loan(1000.0, 0, 0.035).unwrap_err();
        assert!(matches!(err, LoanCoverError::InvalidInput { ref field, .. } if field == "term_years"));

        // Month count would overflow u32
        let err = AmortizationSchedule::for_loan(1000.0, u32::MAX / 12 + 1, 0.035).unwrap_err();
        assert!(matches!(err, LoanCoverError::InvalidInput { ref field, .. } if field == "term_years"));

        let err = AmortizationSchedule::for_loan(1000.0, 5, -0.02).unwrap_err();
        assert!(matches!(err, LoanCoverError::InvalidInput { ref field, .. } if field == "annual_rate"));
    }

    #[test]
    fn test_opening_row_and_interest_share() {
        let schedule = AmortizationSchedule::for_loan(10_000.0, 1, 0.12).unwrap();
        let rows = schedule.rows_with_opening();

        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0].month, 0);
        assert_eq!(rows[0].balance, 10_000.0);
        assert_eq!(rows[0].interest_share_pct(), 0.0);

        // 100.00 / 888.49
        assert_abs_diff_eq!(rows[1].interest_share_pct(), 11.26, epsilon = 1e-9);
    }

    #[test]
    fn test_monthly_balances_align_with_rows() {
        let schedule = AmortizationSchedule::for_loan(50_000.0, 5, 0.04).unwrap();
        let balances = schedule.monthly_balances();

        assert_eq!(balances.len(), 60);
        assert_eq!(balances[0], schedule.rows[0].balance);
        assert_eq!(*balances.last().unwrap(), 0.0);
    }
}
