//! Bank loan inputs and constant-payment amortization

mod params;
mod schedule;

pub use params::{LoanParameters, MAX_TERM_YEARS};
pub use schedule::{AmortizationRow, AmortizationSchedule, monthly_payment, round_cents};
