use thiserror::Error;

/// Input problems detected before a simulation runs, plus numeric blow-ups during one.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("No debts to calculate")]
    EmptyDebtSet,

    #[error("Debt '{debt_id}' has a non-numeric {field}")]
    NonFiniteField { debt_id: String, field: &'static str },

    #[error("Debt '{debt_id}' has a negative {field}")]
    NegativeField { debt_id: String, field: &'static str },

    #[error("Extra budget must be a finite amount >= 0, got {0}")]
    InvalidExtraBudget(f64),

    #[error("Simulation produced a non-finite {0}")]
    Overflow(&'static str),
}

impl SimulationError {
    pub fn is_internal(&self) -> bool {
        matches!(self, SimulationError::Overflow(_))
    }
}
