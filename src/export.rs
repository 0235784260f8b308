//! Delimited-text export of the schedule and the monthly detail table
//!
//! Pure serialization: every value is already computed, only display
//! rounding is applied here.

use std::io::Write;

use serde::Serialize;

use crate::error::LoanCoverResult;
use crate::loan::AmortizationSchedule;
use crate::pricing::MonthlyDetailRow;

#[derive(Debug, Serialize)]
struct ScheduleCsvRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Payment")]
    payment: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Balance")]
    balance: f64,
    #[serde(rename = "InterestSharePct")]
    interest_share_pct: f64,
}

#[derive(Debug, Serialize)]
struct DetailCsvRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "PolicyYear")]
    policy_year: u32,
    #[serde(rename = "BalanceEndOfMonth")]
    balance_end_of_month: f64,
    #[serde(rename = "DeathProbability")]
    death_probability: f64,
    #[serde(rename = "DiscountFactor")]
    discount_factor: f64,
    #[serde(rename = "PvTerm")]
    pv_term: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Write the amortization table, optionally preceded by the month-0 row
pub fn write_schedule_csv<W: Write>(
    writer: W,
    schedule: &AmortizationSchedule,
    include_opening_row: bool,
) -> LoanCoverResult<()> {
    let rows = if include_opening_row {
        schedule.rows_with_opening()
    } else {
        schedule.rows.clone()
    };

    let mut wtr = csv::Writer::from_writer(writer);
    for row in &rows {
        wtr.serialize(ScheduleCsvRow {
            month: row.month,
            payment: row.payment,
            interest: row.interest,
            principal: row.principal,
            balance: row.balance,
            interest_share_pct: row.interest_share_pct(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the single premium breakdown
pub fn write_detail_csv<W: Write>(writer: W, detail: &[MonthlyDetailRow]) -> LoanCoverResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in detail {
        wtr.serialize(DetailCsvRow {
            month: row.month,
            policy_year: row.policy_year,
            balance_end_of_month: row.balance_end_of_month,
            death_probability: round_to(row.death_probability, 12),
            discount_factor: round_to(row.discount_factor, 12),
            pv_term: round_to(row.pv_term, 8),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
