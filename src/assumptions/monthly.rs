//! Conversion of annual qx into monthly death and survival probabilities
//!
//! Within each policy year the force of mortality is constant:
//! `mu = -ln(1 - q)`, so the probability of surviving `t` years into the
//! policy year is `exp(-mu * t)`. Both monthly sequences are unconditional,
//! i.e. measured from policy inception.

use serde::{Deserialize, Serialize};

use crate::error::{LoanCoverError, LoanCoverResult};

/// Floor applied to `1 - q` before taking the logarithm
const MIN_ANNUAL_SURVIVAL: f64 = 1e-15;

fn check_annual_rates(q_by_year: &[f64]) -> LoanCoverResult<()> {
    if q_by_year.is_empty() {
        return Err(LoanCoverError::invalid_input(
            "annual_q",
            "at least one policy year is required",
        ));
    }
    if let Some((year, q)) = q_by_year
        .iter()
        .enumerate()
        .find(|(_, q)| !(**q >= 0.0 && **q <= 1.0))
    {
        return Err(LoanCoverError::invalid_input(
            "annual_q",
            format!("policy year {} has q = {} outside [0, 1]", year + 1, q),
        ));
    }
    Ok(())
}

fn force_of_mortality(q: f64) -> f64 {
    -(1.0 - q).max(MIN_ANNUAL_SURVIVAL).ln()
}

/// Walk every month of every policy year, handing the callback the survival
/// to the start of the year, the force of mortality and the month (1..=12)
fn for_each_month(q_by_year: &[f64], mut visit: impl FnMut(f64, f64, u32)) {
    let mut survival_to_year_start = 1.0;
    for &q in q_by_year {
        let mu = force_of_mortality(q);
        for month in 1..=12 {
            visit(survival_to_year_start, mu, month);
        }
        survival_to_year_start *= 1.0 - q;
    }
}

/// Probability of dying during each month of the term (length 12n)
pub fn monthly_death_probabilities(q_by_year: &[f64]) -> LoanCoverResult<Vec<f64>> {
    check_annual_rates(q_by_year)?;

    let mut probs = Vec::with_capacity(q_by_year.len() * 12);
    for_each_month(q_by_year, |survival, mu, month| {
        let m = month as f64;
        let alive_at_start = (-mu * (m - 1.0) / 12.0).exp();
        let alive_at_end = (-mu * m / 12.0).exp();
        probs.push(survival * (alive_at_start - alive_at_end));
    });
    Ok(probs)
}

/// Probability of being alive at the start of each month (length 12n)
pub fn monthly_survival_to_start(q_by_year: &[f64]) -> LoanCoverResult<Vec<f64>> {
    check_annual_rates(q_by_year)?;

    let mut surv = Vec::with_capacity(q_by_year.len() * 12);
    for_each_month(q_by_year, |survival, mu, month| {
        surv.push(survival * (-mu * (month as f64 - 1.0) / 12.0).exp());
    });
    Ok(surv)
}

/// Month-aligned death and survival sequences over the whole term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMortalityProfile {
    death_probabilities: Vec<f64>,
    survival_to_start: Vec<f64>,
}

impl MonthlyMortalityProfile {
    /// Build both sequences from the annual rates of policy years 1..=n
    pub fn from_annual_rates(q_by_year: &[f64]) -> LoanCoverResult<Self> {
        Ok(Self {
            death_probabilities: monthly_death_probabilities(q_by_year)?,
            survival_to_start: monthly_survival_to_start(q_by_year)?,
        })
    }

    /// P(death during month m), index 0 = month 1
    pub fn death_probabilities(&self) -> &[f64] {
        &self.death_probabilities
    }

    /// P(alive at start of month m), index 0 = month 1 (always 1.0)
    pub fn survival_to_start(&self) -> &[f64] {
        &self.survival_to_start
    }

    pub fn month_count(&self) -> usize {
        self.death_probabilities.len()
    }

    /// Total probability of dying within the term
    pub fn term_death_probability(&self) -> f64 {
        self.death_probabilities.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_two_year_reference_values() {
        let q = [0.01, 0.02];
        let death = monthly_death_probabilities(&q).unwrap();
        let surv = monthly_survival_to_start(&q).unwrap();

        assert_eq!(death.len(), 24);
        assert_eq!(surv.len(), 24);

        // 1 - 0.99^(1/12)
        assert_relative_eq!(death[0], 0.000_837_177_359_120_588_9, max_relative = 1e-12);
        assert_relative_eq!(death[11], 0.000_829_500_024_168_927_7, max_relative = 1e-12);
        assert_relative_eq!(death[12], 0.001_665_321_127_212_178, max_relative = 1e-12);

        // Year 2 starts with survival 0.99
        assert_relative_eq!(surv[12], 0.99, max_relative = 1e-12);
        assert_relative_eq!(surv[13], 0.988_334_678_872_787_8, max_relative = 1e-12);

        // Probability of dying within two years: 1 - 0.99 * 0.98
        assert_abs_diff_eq!(death.iter().sum::<f64>(), 0.0298, epsilon = 1e-12);
    }

    #[test]
    fn test_probability_mass_is_conserved_each_year() {
        let q = [0.0005, 0.013, 0.2, 0.0];
        let death = monthly_death_probabilities(&q).unwrap();
        let surv = monthly_survival_to_start(&q).unwrap();

        let mut start = 1.0;
        for (year, &qy) in q.iter().enumerate() {
            let deaths: f64 = death[year * 12..(year + 1) * 12].iter().sum();
            let next_start = start * (1.0 - qy);
            assert_abs_diff_eq!(deaths + next_start, start, epsilon = 1e-12);
            assert_abs_diff_eq!(surv[year * 12], start, epsilon = 1e-12);
            start = next_start;
        }
    }

    #[test]
    fn test_first_premium_is_certain() {
        for q in [[0.0], [0.5], [1.0]] {
            let surv = monthly_survival_to_start(&q).unwrap();
            assert_eq!(surv[0], 1.0);
        }
    }

    #[test]
    fn test_immortal_cohort() {
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.0; 3]).unwrap();
        assert_eq!(profile.month_count(), 36);
        assert!(profile.death_probabilities().iter().all(|&p| p == 0.0));
        assert!(profile.survival_to_start().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_certain_death_year_is_finite() {
        let death = monthly_death_probabilities(&[1.0]).unwrap();
        assert!(death.iter().all(|p| p.is_finite()));
        assert_abs_diff_eq!(death.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_survival_is_decreasing() {
        let profile = MonthlyMortalityProfile::from_annual_rates(&[0.01, 0.05, 0.1]).unwrap();
        let surv = profile.survival_to_start();
        assert!(surv.windows(2).all(|w| w[1] < w[0]));
        assert_abs_diff_eq!(
            profile.term_death_probability(),
            1.0 - 0.99 * 0.95 * 0.9,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(
            monthly_death_probabilities(&[]),
            Err(LoanCoverError::InvalidInput { .. })
        ));
        assert!(matches!(
            monthly_survival_to_start(&[0.01, 1.5]),
            Err(LoanCoverError::InvalidInput { .. })
        ));
        assert!(matches!(
            MonthlyMortalityProfile::from_annual_rates(&[f64::NAN]),
            Err(LoanCoverError::InvalidInput { .. })
        ));
    }
}
