//! Mortality assumptions: the annual qx table and its monthly conversion

mod mortality;
mod monthly;
pub mod loader;

pub use mortality::MortalityTable;
pub use monthly::{
    MonthlyMortalityProfile, monthly_death_probabilities, monthly_survival_to_start,
};
pub use loader::{load_mortality_table, load_mortality_table_from_reader, resolve_table_path};
