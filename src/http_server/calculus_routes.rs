//! Calculus HTTP Routes
//!
//! `GET /derivative`, `/integral` and `/limit`, nested under `/api` by the server.
//! The calculation runs on the blocking pool; the explanation call is async and
//! bounded by the client timeout.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};

use crate::calculator::{calculate, CalcError, CalcResult, CalculationRequest, CalculationResult, Operation};
use crate::explanation::{DegradeReason, Explanation, ExplanationEnricher};

/// Shared state of the calculus routes, immutable after startup
#[derive(Debug, Clone, Default)]
pub struct CalculusState {
    pub enricher: ExplanationEnricher,
}

impl CalculusState {
    pub fn new(enricher: ExplanationEnricher) -> Self {
        Self { enricher }
    }
}

/// Query string accepted by every calculus endpoint
#[derive(Debug, Default, Deserialize)]
pub struct CalculusQuery {
    pub equation: Option<String>,
    /// limit target, ignored by the other operations
    pub to: Option<String>,
    /// `false` skips the explanation service (default: true)
    pub include_ai: Option<bool>,
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub solution: String,
    pub solution_raw: String,
    pub steps: String,
    pub ai_explanation: String,
}

impl ApiResponse {
    pub fn new(result: CalculationResult, explanation: Explanation) -> Self {
        let payload = explanation.into_payload();
        Self {
            solution: result.solution,
            solution_raw: result.solution_raw,
            steps: payload.steps,
            ai_explanation: payload.explanation,
        }
    }
}

/// Create calculus routes
pub fn calculus_routes(state: Arc<CalculusState>) -> Router {
    Router::new()
        .route("/derivative", get(derivative_handler))
        .route("/integral", get(integral_handler))
        .route("/limit", get(limit_handler))
        .with_state(state)
}

async fn derivative_handler(
    State(state): State<Arc<CalculusState>>,
    Query(query): Query<CalculusQuery>,
) -> CalcResult<Json<ApiResponse>> {
    solve(&state, Operation::Derivative, query).await
}

async fn integral_handler(
    State(state): State<Arc<CalculusState>>,
    Query(query): Query<CalculusQuery>,
) -> CalcResult<Json<ApiResponse>> {
    solve(&state, Operation::Integral, query).await
}

/// Two-sided limit. Diverging one-sided limits of opposite sign give `does not exist`.
async fn limit_handler(
    State(state): State<Arc<CalculusState>>,
    Query(query): Query<CalculusQuery>,
) -> CalcResult<Json<ApiResponse>> {
    solve(&state, Operation::Limit, query).await
}

async fn solve(
    state: &CalculusState,
    operation: Operation,
    query: CalculusQuery,
) -> CalcResult<Json<ApiResponse>> {
    let request = CalculationRequest::new(query.equation.as_deref(), operation, query.to.as_deref())?;
    info!("{} of '{}'", operation, request.expression);

    let job = request.clone();
    let result = tokio::task::spawn_blocking(move || calculate(&job))
        .await
        .map_err(|e| CalcError::Calculation(format!("calculation task failed: {e}")))??;

    let explanation = if query.include_ai.unwrap_or(true) {
        state.enricher.explain(&request, &result.solution_raw).await
    } else {
        Explanation::degraded(DegradeReason::NotRequested)
    };
    Ok(Json(ApiResponse::new(result, explanation)))
}
