//! Loan Cover - amortization schedules and decreasing term assurance pricing
//!
//! This library provides:
//! - Constant-payment amortization schedules with an exact zero final balance
//! - Conversion of annual mortality rates into monthly probabilities
//!   (constant force of mortality within each policy year)
//! - Single premium and level monthly premium (annuity-due) for cover equal
//!   to the outstanding loan balance
//! - CSV export of the schedule and of the monthly premium breakdown

pub mod error;
pub mod loan;
pub mod assumptions;
pub mod pricing;
pub mod quote;
pub mod export;

// Re-export commonly used types
pub use error::{LoanCoverError, LoanCoverResult};
pub use loan::{LoanParameters, AmortizationSchedule, AmortizationRow};
pub use assumptions::{MortalityTable, MonthlyMortalityProfile};
pub use pricing::{PremiumResult, MonthlyDetailRow};
pub use quote::{QuoteEngine, QuoteRequest, Quote, QuoteSummary};
