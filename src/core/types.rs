use serde::{Deserialize, Serialize};

pub const MAX_MONTHS: u32 = 120;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Avalanche,
    Snowball,
}

impl Strategy {
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some(s) if s.trim().eq_ignore_ascii_case("avalanche") => Strategy::Avalanche,
            _ => Strategy::Snowball,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub name: String,
    pub balance: f64,
    pub interest_rate: f64,
    pub min_payment: f64,
}

impl Debt {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        balance: f64,
        interest_rate: f64,
        min_payment: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            interest_rate,
            min_payment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffEvent {
    pub debt: String,
    pub month_paid: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub strategy: Strategy,
    pub total_time_months: u32,
    pub months_saved: u32,
    pub total_interest_paid: f64,
    pub interest_saved_dollars: f64,
    pub payment_plan: Vec<PayoffEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthSnapshot {
    pub month: u32,
    pub interest_accrued: f64,
    pub minimum_paid: f64,
    pub extra_paid: f64,
    pub cumulative_interest: f64,
    pub remaining_balance: f64,
    pub active_debts: usize,
}
