//! Month-by-month breakdown of the single premium

use serde::{Deserialize, Serialize};

use super::discount::TechnicalDiscount;
use crate::error::{LoanCoverError, LoanCoverResult};
use crate::loan::round_cents;

/// Contribution of one month to the single premium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDetailRow {
    /// Month since inception (1-indexed)
    pub month: u32,

    /// Policy year (1-indexed)
    pub policy_year: u32,

    /// Balance paid if death occurs this month
    pub balance_end_of_month: f64,

    /// Unconditional probability of death during the month
    pub death_probability: f64,

    /// `(1 + i)^(-month/12)`
    pub discount_factor: f64,

    /// discount_factor * death_probability * balance
    pub pv_term: f64,
}

/// Build the detail table behind [`super::single_premium`]
pub fn build_monthly_detail(
    balance_end_of_month: &[f64],
    death_prob_month: &[f64],
    annual_tech_rate: f64,
) -> LoanCoverResult<Vec<MonthlyDetailRow>> {
    if balance_end_of_month.len() != death_prob_month.len() {
        return Err(LoanCoverError::dimension_mismatch(
            "monthly detail: monthly balances vs monthly death probabilities",
            balance_end_of_month.len(),
            death_prob_month.len(),
        ));
    }

    let discount = TechnicalDiscount::new(annual_tech_rate);

    Ok(balance_end_of_month
        .iter()
        .zip(death_prob_month)
        .enumerate()
        .map(|(idx, (&balance, &death_probability))| {
            let month = idx as u32 + 1;
            let discount_factor = discount.factor_at(month);
            MonthlyDetailRow {
                month,
                policy_year: (month - 1) / 12 + 1,
                balance_end_of_month: round_cents(balance),
                death_probability,
                discount_factor,
                pv_term: discount_factor * death_probability * balance,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::MonthlyMortalityProfile;
    use crate::loan::AmortizationSchedule;
    use crate::pricing::single_premium;
    use approx::assert_relative_eq;

    #[test]
    fn test_detail_sums_to_single_premium() {
        let schedule = AmortizationSchedule::for_loan(80_000.0, 3, 0.025).unwrap();
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.004, 0.0045, 0.005]).unwrap();
        let balances = schedule.monthly_balances();

        let detail = build_monthly_detail(&balances, profile.death_probabilities(), 0.02).unwrap();
        let total: f64 = detail.iter().map(|r| r.pv_term).sum();
        let expected = single_premium(&balances, profile.death_probabilities(), 0.02).unwrap();

        assert_eq!(detail.len(), 36);
        assert_relative_eq!(total, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_policy_years_and_discount() {
        let balances = vec![100.0; 25];
        let probs = vec![0.001; 25];
        let detail = build_monthly_detail(&balances, &probs, 0.05).unwrap();

        assert_eq!(detail[0].month, 1);
        assert_eq!(detail[0].policy_year, 1);
        assert_eq!(detail[11].policy_year, 1);
        assert_eq!(detail[12].policy_year, 2);
        assert_eq!(detail[24].policy_year, 3);
        assert_relative_eq!(detail[11].discount_factor, 1.0 / 1.05, max_relative = 1e-14);
    }

    #[test]
    fn test_mismatch_rejected() {
        assert!(matches!(
            build_monthly_detail(&[1.0; 12], &[0.1; 11], 0.0),
            Err(LoanCoverError::DimensionMismatch { left: 12, right: 11, .. })
        ));
    }
}
