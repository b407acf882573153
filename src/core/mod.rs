mod accounts;
mod engine;
mod error;
mod types;

pub use accounts::{Account, DebtSource, debts_from_accounts, fallback_debts, resolve_debts};
pub use engine::{simulate, simulate_with_schedule, validate_inputs};
pub use error::SimulationError;
pub use types::{Debt, MAX_MONTHS, MonthSnapshot, PayoffEvent, SimulationResult, Strategy};
