use std::cmp::Ordering;

use tracing::debug;

use super::error::SimulationError;
use super::types::{Debt, MAX_MONTHS, MonthSnapshot, PayoffEvent, SimulationResult, Strategy};

const BASELINE_DEFAULT_RATE: f64 = 0.05;
const BASELINE_SAVINGS_FACTOR: f64 = 0.15;
const STRATEGY_COST_FACTOR: f64 = 0.10;

#[derive(Debug, Clone)]
struct WorkingDebt<'a> {
    position: usize,
    name: &'a str,
    balance: f64,
    interest_rate: f64,
    min_payment: f64,
}

#[derive(Debug)]
struct StrategyRun {
    months: u32,
    total_interest_paid: f64,
    payment_plan: Vec<PayoffEvent>,
    schedule: Vec<MonthSnapshot>,
}

pub fn simulate(
    debts: &[Debt],
    extra_budget: f64,
    strategy: Strategy,
) -> Result<SimulationResult, SimulationError> {
    simulate_with_schedule(debts, extra_budget, strategy).map(|(result, _)| result)
}

pub fn simulate_with_schedule(
    debts: &[Debt],
    extra_budget: f64,
    strategy: Strategy,
) -> Result<(SimulationResult, Vec<MonthSnapshot>), SimulationError> {
    validate_inputs(debts, extra_budget)?;

    let mut run = run_strategy(debts, extra_budget, strategy);
    let baseline_months = run_baseline(debts);
    debug!(
        strategy = strategy.as_str(),
        debts = debts.len(),
        strategy_months = run.months,
        baseline_months,
        "simulation finished"
    );

    let schedule = std::mem::take(&mut run.schedule);
    let result = build_result(debts, extra_budget, strategy, run, baseline_months);
    ensure_finite(&result, &schedule)?;
    Ok((result, schedule))
}

pub fn validate_inputs(debts: &[Debt], extra_budget: f64) -> Result<(), SimulationError> {
    if debts.is_empty() {
        return Err(SimulationError::EmptyDebtSet);
    }

    if !extra_budget.is_finite() || extra_budget < 0.0 {
        return Err(SimulationError::InvalidExtraBudget(extra_budget));
    }

    for debt in debts {
        for (field, value) in [
            ("balance", debt.balance),
            ("interest_rate", debt.interest_rate),
            ("min_payment", debt.min_payment),
        ] {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteField {
                    debt_id: debt.id.clone(),
                    field,
                });
            }
        }

        // A non-positive balance is fine: the debt simply starts out paid off.
        for (field, value) in [
            ("interest_rate", debt.interest_rate),
            ("min_payment", debt.min_payment),
        ] {
            if value < 0.0 {
                return Err(SimulationError::NegativeField {
                    debt_id: debt.id.clone(),
                    field,
                });
            }
        }
    }

    Ok(())
}

fn run_strategy(debts: &[Debt], extra_budget: f64, strategy: Strategy) -> StrategyRun {
    let mut active: Vec<WorkingDebt<'_>> = debts
        .iter()
        .enumerate()
        .filter(|(_, debt)| debt.balance > 0.0)
        .map(|(position, debt)| WorkingDebt {
            position,
            name: &debt.name,
            balance: debt.balance,
            interest_rate: debt.interest_rate,
            min_payment: debt.min_payment,
        })
        .collect();
    sort_by_policy(&mut active, strategy);

    let mut months = 0;
    let mut total_interest_paid = 0.0;
    let mut rolling_extra = extra_budget;
    let mut payment_plan = Vec::new();
    let mut schedule = Vec::new();

    while months < MAX_MONTHS && active_balance(&active) > 0.0 {
        months += 1;

        let mut interest_accrued = 0.0;
        let mut minimum_paid = 0.0;
        for debt in &mut active {
            let interest = debt.balance * (debt.interest_rate / 12.0);
            debt.balance += interest;
            total_interest_paid += interest;
            interest_accrued += interest;
            let min_payment = debt.min_payment;
            minimum_paid += apply_payment(debt, min_payment);
        }

        let extra_paid = cascade_extra(&mut active, rolling_extra);

        // Freed minimums join the rolling budget from next month on.
        for debt in active.iter().filter(|debt| debt.balance <= 0.0) {
            rolling_extra += debt.min_payment;
            payment_plan.push(PayoffEvent {
                debt: debt.name.to_string(),
                month_paid: months,
            });
        }
        active.retain(|debt| debt.balance > 0.0);
        sort_by_policy(&mut active, strategy);

        schedule.push(MonthSnapshot {
            month: months,
            interest_accrued,
            minimum_paid,
            extra_paid,
            cumulative_interest: total_interest_paid,
            remaining_balance: active_balance(&active),
            active_debts: active.len(),
        });
    }

    StrategyRun {
        months,
        total_interest_paid,
        payment_plan,
        schedule,
    }
}

fn run_baseline(debts: &[Debt]) -> u32 {
    let total_min = total_min_payments(debts);
    if total_min <= 0.0 {
        return 0;
    }

    let avg_rate = average_rate(debts);
    let mut balance: f64 = debts.iter().map(|debt| debt.balance).sum();
    let mut months = 0;
    while balance > 0.0 && months < MAX_MONTHS {
        balance += balance * (avg_rate / 12.0);
        balance -= total_min;
        months += 1;
    }
    months
}

fn build_result(
    debts: &[Debt],
    extra_budget: f64,
    strategy: Strategy,
    run: StrategyRun,
    baseline_months: u32,
) -> SimulationResult {
    let total_min = total_min_payments(debts);
    let interest_saved_dollars = (baseline_months as f64 * total_min * BASELINE_SAVINGS_FACTOR
        - run.months as f64 * (total_min + extra_budget) * STRATEGY_COST_FACTOR)
        .max(0.0);

    SimulationResult {
        strategy,
        total_time_months: run.months.min(MAX_MONTHS),
        months_saved: baseline_months.saturating_sub(run.months),
        total_interest_paid: run.total_interest_paid,
        interest_saved_dollars,
        payment_plan: run.payment_plan,
    }
}

fn ensure_finite(
    result: &SimulationResult,
    schedule: &[MonthSnapshot],
) -> Result<(), SimulationError> {
    if !result.total_interest_paid.is_finite() {
        return Err(SimulationError::Overflow("total_interest_paid"));
    }
    if !result.interest_saved_dollars.is_finite() {
        return Err(SimulationError::Overflow("interest_saved_dollars"));
    }
    if schedule
        .iter()
        .any(|row| !row.remaining_balance.is_finite() || !row.extra_paid.is_finite())
    {
        return Err(SimulationError::Overflow("remaining_balance"));
    }
    Ok(())
}

fn sort_by_policy(active: &mut [WorkingDebt<'_>], strategy: Strategy) {
    active.sort_by(|a, b| policy_order(a, b, strategy).then(a.position.cmp(&b.position)));
}

fn policy_order(a: &WorkingDebt<'_>, b: &WorkingDebt<'_>, strategy: Strategy) -> Ordering {
    match strategy {
        Strategy::Avalanche => b.interest_rate.total_cmp(&a.interest_rate),
        Strategy::Snowball => a.balance.total_cmp(&b.balance),
    }
}

fn apply_payment(debt: &mut WorkingDebt<'_>, amount: f64) -> f64 {
    let applied = amount.min(debt.balance).max(0.0);
    debt.balance = (debt.balance - applied).max(0.0);
    applied
}

fn cascade_extra(active: &mut [WorkingDebt<'_>], budget: f64) -> f64 {
    let mut available = budget;
    for debt in active.iter_mut() {
        if available <= 0.0 {
            break;
        }
        available -= apply_payment(debt, available);
    }
    budget - available
}

fn active_balance(active: &[WorkingDebt<'_>]) -> f64 {
    active.iter().map(|debt| debt.balance).sum()
}

fn total_min_payments(debts: &[Debt]) -> f64 {
    debts.iter().map(|debt| debt.min_payment).sum()
}

fn average_rate(debts: &[Debt]) -> f64 {
    if debts.is_empty() {
        return BASELINE_DEFAULT_RATE;
    }
    debts.iter().map(|debt| debt.interest_rate).sum::<f64>() / debts.len() as f64
}
