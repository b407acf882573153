use axum::{
    Router,
    extract::{Json, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::core::{
    Account, Debt, DebtSource, MonthSnapshot, SimulationError, SimulationResult, Strategy,
    fallback_debts, resolve_debts, simulate_with_schedule,
};

const INTERNAL_ERROR_MESSAGE: &str = "Internal error while processing the simulation";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStrategy {
    Avalanche,
    Snowball,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Avalanche => Strategy::Avalanche,
            CliStrategy::Snowball => Strategy::Snowball,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn resolve(&self, field: &str) -> Result<f64, String> {
        match self {
            Amount::Number(value) => Ok(*value),
            Amount::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("{field} must be numeric, got {text:?}")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DebtId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
struct DebtPayload {
    #[serde(default)]
    id: Option<DebtId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    balance: Option<Amount>,
    #[serde(default)]
    interest_rate: Option<Amount>,
    #[serde(default)]
    min_payment: Option<Amount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalculatePayload {
    strategy: Option<String>,
    extra_budget: Option<Amount>,
    debts: Option<Vec<DebtPayload>>,
    schedule: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "debtplan",
    about = "Debt payoff simulator (avalanche or snowball with a rolling extra budget)"
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = CliStrategy::Avalanche)]
    strategy: CliStrategy,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Amount paid each month on top of the minimum payments"
    )]
    extra_budget: f64,
    #[arg(
        long,
        help = "JSON file holding an array of debts; defaults to the built-in sample set"
    )]
    debts_file: Option<PathBuf>,
    #[arg(long, help = "Include the month-by-month schedule in the output")]
    schedule: bool,
}

#[derive(Debug)]
struct CalculateRequest {
    debts: Vec<Debt>,
    extra_budget: f64,
    strategy: Strategy,
    include_schedule: bool,
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    #[serde(flatten)]
    result: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<MonthSnapshot>>,
}

#[derive(Debug, Serialize)]
struct DebtsResponse {
    source: DebtSource,
    debts: Vec<Debt>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/debts", get(debts_handler))
        .route("/api/debts/from-accounts", post(debts_from_accounts_handler))
        .route("/api/calculate", post(calculate_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("debtplan HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, router()).await
}

pub fn run_cli(cli: Cli) -> Result<String, String> {
    let debts = match &cli.debts_file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
            let payload = serde_json::from_str::<Vec<DebtPayload>>(&raw)
                .map_err(|e| format!("Invalid debts file {}: {e}", path.display()))?;
            debts_from_payload(payload)?
        }
        None => fallback_debts(),
    };

    let (result, schedule) =
        simulate_with_schedule(&debts, cli.extra_budget, cli.strategy.into())
            .map_err(|e| e.to_string())?;
    let response = build_calculate_response(result, schedule, cli.schedule);
    serde_json::to_string_pretty(&response).map_err(|e| format!("Cannot encode result: {e}"))
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn debts_handler() -> Response {
    let (debts, source) = resolve_debts(None);
    debug!(count = debts.len(), "serving fallback debts");
    json_response(StatusCode::OK, DebtsResponse { source, debts })
}

async fn debts_from_accounts_handler(
    payload: Result<Json<Vec<Account>>, JsonRejection>,
) -> Response {
    let accounts = match payload {
        Ok(Json(accounts)) => accounts,
        Err(rejection) => {
            warn!("rejected account payload: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid accounts payload: {}", rejection.body_text()),
            );
        }
    };

    let (debts, source) = resolve_debts(Some(accounts.as_slice()));
    debug!(
        accounts = accounts.len(),
        debts = debts.len(),
        ?source,
        "mapped accounts to debts"
    );
    json_response(StatusCode::OK, DebtsResponse { source, debts })
}

async fn calculate_handler(payload: Result<Json<CalculatePayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!("rejected calculate payload: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON payload");
        }
    };

    let request = match calculate_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!("invalid calculate request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match simulate_with_schedule(&request.debts, request.extra_budget, request.strategy) {
        Ok((result, schedule)) => {
            debug!(
                strategy = result.strategy.as_str(),
                months = result.total_time_months,
                "calculation complete"
            );
            json_response(
                StatusCode::OK,
                build_calculate_response(result, schedule, request.include_schedule),
            )
        }
        Err(err) if err.is_internal() => {
            error!("simulation failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
        Err(err) => {
            warn!("simulation rejected input: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let (status, bytes) = match serde_json::to_vec(&body) {
        Ok(bytes) => (status, bytes),
        Err(e) => {
            error!("failed to encode response body: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(r#"{{"error":"{INTERNAL_ERROR_MESSAGE}"}}"#).into_bytes(),
            )
        }
    };

    (
        status,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    )
        .into_response()
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn calculate_request_from_json(json: &str) -> Result<CalculateRequest, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid JSON payload: {e}"))?;
    calculate_request_from_payload(payload)
}

fn calculate_request_from_payload(payload: CalculatePayload) -> Result<CalculateRequest, String> {
    let debts = match payload.debts {
        Some(debts) if !debts.is_empty() => debts_from_payload(debts)?,
        _ => return Err(SimulationError::EmptyDebtSet.to_string()),
    };

    let extra_budget = match &payload.extra_budget {
        Some(amount) => amount.resolve("extra_budget")?,
        None => 0.0,
    };

    Ok(CalculateRequest {
        debts,
        extra_budget,
        strategy: Strategy::from_selector(payload.strategy.as_deref()),
        include_schedule: payload.schedule,
    })
}

fn debts_from_payload(payload: Vec<DebtPayload>) -> Result<Vec<Debt>, String> {
    payload
        .into_iter()
        .enumerate()
        .map(|(index, debt)| -> Result<Debt, String> {
            let required = |value: &Option<Amount>, field: &str| -> Result<f64, String> {
                let label = format!("debts[{index}].{field}");
                match value {
                    Some(amount) => amount.resolve(&label),
                    None => Err(format!("{label} is required")),
                }
            };

            Ok(Debt {
                id: match &debt.id {
                    Some(DebtId::Text(id)) => id.clone(),
                    Some(DebtId::Number(id)) => id.to_string(),
                    None => format!("debt-{}", index + 1),
                },
                name: debt
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Debt {}", index + 1)),
                balance: required(&debt.balance, "balance")?,
                interest_rate: required(&debt.interest_rate, "interest_rate")?,
                min_payment: required(&debt.min_payment, "min_payment")?,
            })
        })
        .collect()
}

fn build_calculate_response(
    result: SimulationResult,
    schedule: Vec<MonthSnapshot>,
    include_schedule: bool,
) -> CalculateResponse {
    CalculateResponse {
        result,
        schedule: include_schedule.then_some(schedule),
    }
}
