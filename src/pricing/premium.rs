//! Single premium, annuity-due present value and level monthly premium

use serde::{Deserialize, Serialize};

use super::discount::TechnicalDiscount;
use crate::assumptions::MonthlyMortalityProfile;
use crate::error::{LoanCoverError, LoanCoverResult};

/// Net single premium for a benefit equal to the balance at the end of the
/// month of death
///
/// `sum_m (1 + i)^(-m/12) * P(death in month m) * balance_m`, m = 1..=N.
/// Both sequences must have the same length; nothing is truncated.
pub fn single_premium(
    balance_end_of_month: &[f64],
    death_prob_month: &[f64],
    annual_tech_rate: f64,
) -> LoanCoverResult<f64> {
    if balance_end_of_month.len() != death_prob_month.len() {
        return Err(LoanCoverError::dimension_mismatch(
            "single premium: monthly balances vs monthly death probabilities",
            balance_end_of_month.len(),
            death_prob_month.len(),
        ));
    }

    Ok(TechnicalDiscount::new(annual_tech_rate)
        .pv_end_of_month_benefits(death_prob_month, balance_end_of_month))
}

/// Present value of 1 paid at the start of every month while alive
///
/// Index 0 is the premium due at inception.
pub fn present_value_annuity_due(survival_to_start: &[f64], annual_tech_rate: f64) -> f64 {
    TechnicalDiscount::new(annual_tech_rate).pv_start_of_month_payments(survival_to_start)
}

/// Level monthly premium; NaN when the annuity value is not positive
pub fn level_monthly_premium(single_premium: f64, annuity_pv: f64) -> f64 {
    if annuity_pv > 0.0 {
        single_premium / annuity_pv
    } else {
        f64::NAN
    }
}

/// Headline insurance figures for one quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumResult {
    /// Annual technical rate used for discounting
    pub technical_rate: f64,

    /// Actuarial PV of the death benefit
    pub single_premium: f64,

    /// PV of a unit monthly annuity-due
    pub annuity_due_pv: f64,

    /// Single premium spread over the annuity-due (NaN if degenerate)
    pub level_monthly_premium: f64,
}

impl PremiumResult {
    /// Price the cover for a balance sequence and a mortality profile
    pub fn compute(
        balance_end_of_month: &[f64],
        profile: &MonthlyMortalityProfile,
        annual_tech_rate: f64,
    ) -> LoanCoverResult<Self> {
        let single = single_premium(
            balance_end_of_month,
            profile.death_probabilities(),
            annual_tech_rate,
        )?;
        let annuity = present_value_annuity_due(profile.survival_to_start(), annual_tech_rate);

        Ok(Self {
            technical_rate: annual_tech_rate,
            single_premium: single,
            annuity_due_pv: annuity,
            level_monthly_premium: level_monthly_premium(single, annuity),
        })
    }

    /// True when the annuity value vanished and no level premium exists
    pub fn is_degenerate(&self) -> bool {
        self.level_monthly_premium.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::AmortizationSchedule;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_one_year_reference_quote() {
        let schedule = AmortizationSchedule::for_loan(10_000.0, 1, 0.12).unwrap();
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.1]).unwrap();

        let result = PremiumResult::compute(&schedule.monthly_balances(), &profile, 0.03).unwrap();

        assert_relative_eq!(result.single_premium, 471.946_619_531_252_6, max_relative = 1e-10);
        assert_relative_eq!(result.annuity_due_pv, 11.288_920_009_255_948, max_relative = 1e-10);
        assert_relative_eq!(result.level_monthly_premium, 41.806_179_789_058_37, max_relative = 1e-10);
        assert!(!result.is_degenerate());
    }

    #[test]
    fn test_immortal_cohort_costs_nothing() {
        let balances = vec![1000.0; 24];
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.0, 0.0]).unwrap();

        for rate in [0.0, 0.01, 0.035, 0.10] {
            let result = PremiumResult::compute(&balances, &profile, rate).unwrap();
            assert_eq!(result.single_premium, 0.0);
            assert_eq!(result.level_monthly_premium, 0.0);
        }
    }

    #[test]
    fn test_zero_rate_annuity_counts_expected_payments() {
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.0, 0.0, 0.0]).unwrap();
        assert_abs_diff_eq!(
            present_value_annuity_due(profile.survival_to_start(), 0.0),
            36.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_constant_benefit_matches_term_death_probability() {
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.02, 0.03]).unwrap();
        let balances = vec![1.0; 24];

        let u = single_premium(&balances, profile.death_probabilities(), 0.0).unwrap();
        assert_abs_diff_eq!(u, 1.0 - 0.98 * 0.97, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let balances = vec![1000.0; 240];
        let death = vec![0.001; 180];

        match single_premium(&balances, &death, 0.02) {
            Err(LoanCoverError::DimensionMismatch { left, right, .. }) => {
                assert_eq!(left, 240);
                assert_eq!(right, 180);
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_annuity_gives_nan() {
        assert!(level_monthly_premium(100.0, 0.0).is_nan());
        assert!(level_monthly_premium(100.0, -1.0).is_nan());
        assert_eq!(level_monthly_premium(120.0, 12.0), 10.0);
    }

    #[test]
    fn test_higher_technical_rate_lowers_single_premium() {
        let schedule = AmortizationSchedule::for_loan(150_000.0, 15, 0.03).unwrap();
        let q: Vec<f64> = (0..15).map(|k| 0.002 + 0.0005 * k as f64).collect();
        let profile = MonthlyMortalityProfile::from_annual_rates(&q).unwrap();
        let balances = schedule.monthly_balances();

        let low = PremiumResult::compute(&balances, &profile, 0.01).unwrap();
        let high = PremiumResult::compute(&balances, &profile, 0.05).unwrap();

        assert!(high.single_premium < low.single_premium);
        assert!(high.annuity_due_pv < low.annuity_due_pv);
    }
}
