//! Actuarial pricing of decreasing term assurance on a loan balance
//!
//! The benefit is the outstanding balance at the end of the month of death.
//! Premiums are level, monthly, paid in advance while the insured is alive
//! (annuity-due).
//!
//! # Example
//!
//! ```rust,ignore
//! use loan_cover::assumptions::MonthlyMortalityProfile;
//! use loan_cover::loan::AmortizationSchedule;
//! use loan_cover::pricing::PremiumResult;
//!
//! let schedule = AmortizationSchedule::for_loan(200_000.0, 20, 0.035)?;
//! let q = table.annual_rates_for_term(50, 20)?;
//! let profile = MonthlyMortalityProfile::from_annual_rates(&q)?;
//! let premium = PremiumResult::compute(&schedule.monthly_balances(), &profile, 0.02)?;
//! println!("Level premium: {:.2}", premium.level_monthly_premium);
//! ```

mod discount;
mod premium;
mod detail;

pub use discount::TechnicalDiscount;
pub use premium::{
    PremiumResult, level_monthly_premium, present_value_annuity_due, single_premium,
};
pub use detail::{MonthlyDetailRow, build_monthly_detail};
