//! Annual mortality table (qx by integer age)
//!
//! Rules enforced on construction:
//! - every qx lies in [0, 1]
//! - qx = 1 is only allowed at the terminal age ω (highest age present)

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{LoanCoverError, LoanCoverResult};

/// Maximum number of offending entries quoted in an error message
const MAX_REPORTED: usize = 10;

/// Validated mapping from age to annual death probability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortalityTable {
    rates: BTreeMap<u32, f64>,
    terminal_age: u32,
}

impl MortalityTable {
    /// Build a table, checking the qx rules
    pub fn new(rates: BTreeMap<u32, f64>) -> LoanCoverResult<Self> {
        let terminal_age = match rates.keys().next_back() {
            Some(&age) => age,
            None => {
                return Err(LoanCoverError::SourceData(
                    "mortality table has no usable rows".to_string(),
                ))
            }
        };

        let below_zero: Vec<(u32, f64)> = rates
            .iter()
            .filter(|&(_, &q)| q < 0.0 || q.is_nan())
            .map(|(&a, &q)| (a, q))
            .take(MAX_REPORTED)
            .collect();
        if !below_zero.is_empty() {
            return Err(LoanCoverError::SourceData(format!(
                "qx < 0 at (age, qx) {:?}",
                below_zero
            )));
        }

        let above_one: Vec<(u32, f64)> = rates
            .iter()
            .filter(|&(_, &q)| q > 1.0)
            .map(|(&a, &q)| (a, q))
            .take(MAX_REPORTED)
            .collect();
        if !above_one.is_empty() {
            return Err(LoanCoverError::SourceData(format!(
                "qx > 1 at (age, qx) {:?}",
                above_one
            )));
        }

        let early_certain_death: Vec<u32> = rates
            .iter()
            .filter(|&(&a, &q)| q == 1.0 && a != terminal_age)
            .map(|(&a, _)| a)
            .take(MAX_REPORTED)
            .collect();
        if !early_certain_death.is_empty() {
            return Err(LoanCoverError::SourceData(format!(
                "qx = 1 only allowed at terminal age {}, found at ages {:?}",
                terminal_age, early_certain_death
            )));
        }

        Ok(Self {
            rates,
            terminal_age,
        })
    }

    /// Build a table from consecutive rates starting at `first_age`
    pub fn from_rates(first_age: u32, qx: &[f64]) -> LoanCoverResult<Self> {
        let mut rates = BTreeMap::new();
        for (offset, &q) in qx.iter().enumerate() {
            let age = u32::try_from(offset)
                .ok()
                .and_then(|offset| first_age.checked_add(offset))
                .ok_or_else(|| {
                    LoanCoverError::invalid_input(
                        "first_age",
                        format!("{} rates from age {} run past the largest age", qx.len(), first_age),
                    )
                })?;
            rates.insert(age, q);
        }
        Self::new(rates)
    }

    /// Annual death probability at an age, if tabulated
    pub fn qx(&self, age: u32) -> Option<f64> {
        self.rates.get(&age).copied()
    }

    /// Highest age in the table (ω)
    pub fn terminal_age(&self) -> u32 {
        self.terminal_age
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Annual rates for policy years 1..=term, i.e. ages x..x+term-1
    pub fn annual_rates_for_term(&self, start_age: u32, term_years: u32) -> LoanCoverResult<Vec<f64>> {
        if term_years == 0 {
            return Err(LoanCoverError::invalid_input("term_years", "must be > 0"));
        }

        let last_age = match start_age.checked_add(term_years - 1) {
            Some(age) => age,
            None => {
                return Err(LoanCoverError::AgeRange {
                    reason: format!(
                        "term too long: table available up to age {}, insured age {} plus {} years exceeds any age",
                        self.terminal_age, start_age, term_years
                    ),
                    ages: vec![start_age],
                })
            }
        };
        if last_age > self.terminal_age {
            return Err(LoanCoverError::AgeRange {
                reason: format!(
                    "term too long: table available up to age {}, insured would reach {}",
                    self.terminal_age, last_age
                ),
                ages: (self.terminal_age.saturating_add(1)..=last_age)
                    .take(MAX_REPORTED)
                    .collect(),
            });
        }

        let missing: Vec<u32> = (start_age..=last_age)
            .filter(|age| !self.rates.contains_key(age))
            .collect();
        if !missing.is_empty() {
            return Err(LoanCoverError::AgeRange {
                reason: format!("{} ages missing from the mortality table", missing.len()),
                ages: missing.into_iter().take(MAX_REPORTED).collect(),
            });
        }

        Ok((start_age..=last_age).map(|age| self.rates[&age]).collect())
    }

    /// Iterate over (age, qx) in age order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.rates.iter().map(|(&a, &q)| (a, q))
    }
}
