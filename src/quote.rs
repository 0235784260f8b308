//! Quote engine combining the loan schedule with the insurance pricing
//!
//! Holds one validated mortality table and prices any number of independent
//! requests against it.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{MonthlyMortalityProfile, MortalityTable};
use crate::error::{LoanCoverError, LoanCoverResult};
use crate::loan::{AmortizationSchedule, LoanParameters};
use crate::pricing::{MonthlyDetailRow, PremiumResult, build_monthly_detail};

/// Loan and insurance inputs for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub loan: LoanParameters,

    /// Age of the insured at inception
    pub insured_age: u32,

    /// Annual technical rate as a fraction
    pub technical_rate: f64,
}

impl QuoteRequest {
    pub fn new(loan: LoanParameters, insured_age: u32, technical_rate: f64) -> Self {
        Self {
            loan,
            insured_age,
            technical_rate,
        }
    }

    pub fn validate(&self) -> LoanCoverResult<()> {
        self.loan.validate()?;
        if !(self.technical_rate.is_finite() && self.technical_rate >= 0.0) {
            return Err(LoanCoverError::invalid_input(
                "technical_rate",
                format!("must be >= 0, got {}", self.technical_rate),
            ));
        }
        Ok(())
    }
}

/// Everything computed for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub request: QuoteRequest,
    pub schedule: AmortizationSchedule,
    pub profile: MonthlyMortalityProfile,
    pub premium: PremiumResult,
    pub detail: Vec<MonthlyDetailRow>,
}

impl Quote {
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            insured_age: self.request.insured_age,
            months: self.schedule.month_count() as u32,
            loan_payment: self.schedule.payment,
            total_interest: self.schedule.total_interest,
            total_cost: self.schedule.total_cost,
            technical_rate: self.premium.technical_rate,
            single_premium: self.premium.single_premium,
            annuity_due_pv: self.premium.annuity_due_pv,
            level_monthly_premium: self.premium.level_monthly_premium,
            term_death_probability: self.profile.term_death_probability(),
        }
    }
}

/// Headline figures of a quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub insured_age: u32,
    pub months: u32,
    pub loan_payment: f64,
    pub total_interest: f64,
    pub total_cost: f64,
    pub technical_rate: f64,
    pub single_premium: f64,
    pub annuity_due_pv: f64,
    pub level_monthly_premium: f64,
    pub term_death_probability: f64,
}

/// Prices quotes against a pre-loaded mortality table
///
/// # Example
/// ```ignore
/// let engine = QuoteEngine::new(load_mortality_table("data/mortality_table.csv")?);
/// let loan = LoanParameters::new(200_000.0, 20, 0.035);
/// let quote = engine.quote(&QuoteRequest::new(loan, 50, 0.02))?;
/// println!("{:.2} / month", quote.premium.level_monthly_premium);
/// ```
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    table: MortalityTable,
}

impl QuoteEngine {
    pub fn new(table: MortalityTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &MortalityTable {
        &self.table
    }

    /// Price one request; every check runs before any pricing
    pub fn quote(&self, request: &QuoteRequest) -> LoanCoverResult<Quote> {
        request.validate()?;

        let q_by_year = self
            .table
            .annual_rates_for_term(request.insured_age, request.loan.term_years)?;

        let schedule = AmortizationSchedule::compute(&request.loan)?;
        let profile = MonthlyMortalityProfile::from_annual_rates(&q_by_year)?;
        let balances = schedule.monthly_balances();

        let premium = PremiumResult::compute(&balances, &profile, request.technical_rate)?;
        let detail = build_monthly_detail(
            &balances,
            profile.death_probabilities(),
            request.technical_rate,
        )?;

        debug!(
            "Quote age {} term {}y: single premium {:.2}, annuity PV {:.6}, level {:.4}",
            request.insured_age,
            request.loan.term_years,
            premium.single_premium,
            premium.annuity_due_pv,
            premium.level_monthly_premium
        );

        Ok(Quote {
            request: *request,
            schedule,
            profile,
            premium,
            detail,
        })
    }

    /// Price independent requests in parallel, results in request order
    pub fn quote_batch(&self, requests: &[QuoteRequest]) -> Vec<LoanCoverResult<Quote>> {
        info!("Pricing {} quotes", requests.len());
        requests.par_iter().map(|r| self.quote(r)).collect()
    }

    /// Summaries for every (age, technical rate) pair on the same loan
    ///
    /// Rows follow `ages` order, then `technical_rates` order.
    pub fn premium_grid(
        &self,
        loan: LoanParameters,
        ages: &[u32],
        technical_rates: &[f64],
    ) -> Vec<LoanCoverResult<QuoteSummary>> {
        let requests: Vec<QuoteRequest> = ages
            .iter()
            .flat_map(|&age| {
                technical_rates
                    .iter()
                    .map(move |&rate| QuoteRequest::new(loan, age, rate))
            })
            .collect();

        self.quote_batch(&requests)
            .into_iter()
            .map(|quote| quote.map(|q| q.summary()))
            .collect()
    }
}
