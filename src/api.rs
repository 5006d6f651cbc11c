//! HTTP API for the Payroll Engine.
//!
//! This module exposes a minimal JSON API around the calculators
//! using the [`axum`](https://crates.io/crates/axum) framework.  Each
//! route deserialises one calculator input, optionally naming the tax
//! regime, and returns the calculator's result.  Calculation errors
//! are reported as `{"error": "..."}` with status 422, or 404 when the
//! requested regime is unknown.

use crate::config::Config;
use crate::engine::{gross_to_net, net_to_gross, run_batch};
use crate::error::CalcError;
use crate::models::{
    BatchResult, FutureValueInput, FutureValueResult, NetToGrossInput, PayrollBatch, PayrollInput,
    PayrollResult, SavingsGoalInput, SavingsPlanResult, UnemploymentInput, UnemploymentResult,
};
use crate::savings::{future_value, required_contribution};
use crate::statute::{load_statute_book, StatuteBook};
use crate::unemployment::compute_benefit;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across requests.
pub struct AppState {
    pub statutes: StatuteBook,
}

/// A calculator input plus the regime it should be computed under.
#[derive(Debug, Deserialize)]
pub struct WithRegime<T> {
    #[serde(default)]
    pub regime: Option<String>,
    #[serde(flatten)]
    pub input: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatuteList {
    pub versions: Vec<String>,
    pub default: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NetToGrossResponse {
    pub gross: Decimal,
    pub payroll: PayrollResult,
}

#[derive(Debug)]
pub enum ApiError {
    Calc(CalcError),
    Internal(String),
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        ApiError::Calc(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Calc(err @ CalcError::UnknownRegime(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Calc(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Build the API router over the given statutes.
pub fn build_router(statutes: StatuteBook) -> Router {
    let state = Arc::new(AppState { statutes });
    Router::new()
        .route("/api/statutes", get(statutes_handler))
        .route("/api/gross-to-net", post(gross_to_net_handler))
        .route("/api/net-to-gross", post(net_to_gross_handler))
        .route("/api/future-value", post(future_value_handler))
        .route("/api/savings-plan", post(savings_plan_handler))
        .route("/api/unemployment-benefit", post(unemployment_handler))
        .route("/api/payroll-batch", post(batch_handler))
        .with_state(state)
}

async fn statutes_handler(State(state): State<Arc<AppState>>) -> Json<StatuteList> {
    Json(StatuteList {
        versions: state.statutes.versions(),
        default: state.statutes.default_version().to_string(),
    })
}

async fn gross_to_net_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WithRegime<PayrollInput>>,
) -> Result<Json<PayrollResult>, ApiError> {
    let statute = state.statutes.get(request.regime.as_deref())?;
    Ok(Json(gross_to_net(&request.input, statute)?))
}

async fn net_to_gross_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WithRegime<NetToGrossInput>>,
) -> Result<Json<NetToGrossResponse>, ApiError> {
    let statute = state.statutes.get(request.regime.as_deref())?;
    let input = request.input;
    let gross = net_to_gross(&input, statute)?;
    let payroll = gross_to_net(
        &PayrollInput {
            gross_salary: gross,
            dependent_count: input.dependent_count,
            region: input.region,
            insurance_base: input.insurance_base,
        },
        statute,
    )?;
    Ok(Json(NetToGrossResponse { gross, payroll }))
}

async fn future_value_handler(
    Json(input): Json<FutureValueInput>,
) -> Result<Json<FutureValueResult>, ApiError> {
    Ok(Json(future_value(&input)?))
}

async fn savings_plan_handler(
    Json(input): Json<SavingsGoalInput>,
) -> Result<Json<SavingsPlanResult>, ApiError> {
    Ok(Json(required_contribution(&input)?))
}

async fn unemployment_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WithRegime<UnemploymentInput>>,
) -> Result<Json<UnemploymentResult>, ApiError> {
    let statute = state.statutes.get(request.regime.as_deref())?;
    Ok(Json(compute_benefit(&request.input, statute)?))
}

/// Handler for POST /api/payroll-batch.  The batch runs on the
/// blocking pool so rayon does not stall the async workers.
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WithRegime<PayrollBatch>>,
) -> Result<Json<BatchResult>, ApiError> {
    let statute = state.statutes.get(request.regime.as_deref())?.clone();
    let batch = request.input;
    let result = tokio::task::spawn_blocking(move || run_batch(batch, &statute))
        .await
        .map_err(|err| ApiError::Internal(format!("batch task failed: {err}")))?;
    Ok(Json(result))
}

/// Launch the API server.  Loads statutes from the configured
/// directory on top of the built-in ones, then serves until the
/// process is stopped.
pub async fn serve(config: &Config) -> Result<()> {
    let mut statutes = load_statute_book(&config.statute_dir)?;
    statutes
        .set_default(&config.default_regime)
        .context("PAYROLL_DEFAULT_REGIME")?;
    info!(
        versions = ?statutes.versions(),
        default = %statutes.default_version(),
        "statutes loaded"
    );
    let router = build_router(statutes);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, router.into_make_service())
        .await
        .context("server error")
}
