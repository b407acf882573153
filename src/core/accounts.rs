use serde::{Deserialize, Serialize};

use super::types::Debt;

const CREDIT_CARD: &str = "Credit Card";
const LOAN: &str = "Loan";

const DEFAULT_CARD_APR: f64 = 0.28;
const CARD_MIN_PAYMENT_FLOOR: f64 = 25.0;
const CARD_MIN_PAYMENT_SHARE: f64 = 0.01;
const DEFAULT_LOAN_RATE: f64 = 0.075;
const DEFAULT_LOAN_PAYMENT: f64 = 150.0;
const DEFAULT_ACCOUNT_NAME: &str = "Debt Account";

/// Account record as returned by the account aggregator. Only the fields the debt
/// mapping reads are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub apr: Option<f64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub monthly_payment: Option<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtSource {
    Accounts,
    Fallback,
}

/// Maps credit card and loan accounts with an outstanding balance to debts, keeping
/// account order. Other account types are ignored.
pub fn debts_from_accounts(accounts: &[Account]) -> Vec<Debt> {
    accounts.iter().filter_map(debt_from_account).collect()
}

fn debt_from_account(account: &Account) -> Option<Debt> {
    let balance = account.balance.unwrap_or(0.0);
    if !balance.is_finite() || balance <= 0.0 {
        return None;
    }

    let (interest_rate, min_payment) = match account.kind.as_str() {
        CREDIT_CARD => (
            account.apr.unwrap_or(DEFAULT_CARD_APR),
            (balance * CARD_MIN_PAYMENT_SHARE).max(CARD_MIN_PAYMENT_FLOOR),
        ),
        LOAN => (
            account.interest_rate.unwrap_or(DEFAULT_LOAN_RATE),
            account.monthly_payment.unwrap_or(DEFAULT_LOAN_PAYMENT),
        ),
        _ => return None,
    };

    Some(Debt {
        id: account.id.clone(),
        name: account
            .nickname
            .clone()
            .unwrap_or_else(|| DEFAULT_ACCOUNT_NAME.to_string()),
        balance,
        interest_rate,
        min_payment,
    })
}

/// Static debt set served when the aggregator has nothing usable.
pub fn fallback_debts() -> Vec<Debt> {
    vec![
        Debt::new("c1", "Platinum Card", 4_500.0, 0.28, 150.0),
        Debt::new("c2", "Personal Auto Loan", 12_000.0, 0.075, 400.0),
        Debt::new("c3", "Student Loan", 800.0, 0.04, 50.0),
    ]
}

/// Debts mapped from `accounts` when that yields at least one debt, otherwise the
/// fallback set. `None` means the aggregator could not be reached.
pub fn resolve_debts(accounts: Option<&[Account]>) -> (Vec<Debt>, DebtSource) {
    let mapped = accounts.map(debts_from_accounts).unwrap_or_default();
    if mapped.is_empty() {
        (fallback_debts(), DebtSource::Fallback)
    } else {
        (mapped, DebtSource::Accounts)
    }
}
