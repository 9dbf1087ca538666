//! HTTP route handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use tracing::warn;

use crate::bookability::resolve_itinerary_bookability;
use crate::cache::CachedStore;
use crate::domain::{Itinerary, TransferEdge};
use crate::planner::{
    EdgeFetchError, EdgeSource, Engine, PathQuery, PathResult, TransferGraph,
    plan_transfer_amounts,
};
use crate::store::{ItineraryRow, StoreError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/programs", get(list_programs))
        .route("/api/points/:user_id", get(user_balances))
        .route("/api/itineraries", get(search_itineraries))
        .route("/transfer/path", post(find_path))
        .route("/transfer/plan", post(plan_amounts))
        .route("/itinerary/bookability", post(bookability))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List loyalty programs.
async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProgramResult>>, AppError> {
    let programs = state.store.programs().await?;
    let results = programs
        .iter()
        .map(|p| ProgramResult {
            id: p.id,
            name: p.name.clone(),
        })
        .collect();
    Ok(Json(results))
}

/// A user's per-program point balances.
async fn user_balances(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BalancesResponse>, AppError> {
    // Balance fetch failures read as "no points anywhere", matching the
    // empty-state the UI shows a brand-new user.
    let balances = match state.store.user_point_balances(&user_id).await {
        Ok(balances) => balances,
        Err(e) => {
            warn!(error = %e, %user_id, "balance fetch failed, returning empty");
            HashMap::new()
        }
    };
    Ok(Json(BalancesResponse { balances }))
}

/// Search itineraries by route and departure date.
async fn search_itineraries(
    State(state): State<AppState>,
    Query(query): Query<ItinerarySearchQuery>,
) -> Result<Json<Vec<ItineraryRow>>, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest {
            message: format!("Invalid date: {}", query.date),
        }
    })?;

    // Search failures degrade to an empty result list
    match state
        .store
        .search_itineraries(&query.origin, &query.destination, date)
        .await
    {
        Ok(rows) => Ok(Json(rows)),
        Err(e) => {
            warn!(error = %e, "itinerary search failed, returning empty");
            Ok(Json(Vec::new()))
        }
    }
}

/// Find the best transfer path from a source program to any program able
/// to book the itinerary.
async fn find_path(
    State(state): State<AppState>,
    Json(req): Json<FindPathRequest>,
) -> Result<Json<FindPathResponse>, AppError> {
    if req.destination_program_ids.is_empty() {
        return Err(AppError::BadRequest {
            message: "destination_program_ids must not be empty".to_string(),
        });
    }

    let query = PathQuery {
        source: req.source_program_id,
        targets: req.destination_program_ids,
        mode: req.mode,
    };

    let provider = CachedEdgeSource {
        store: state.store.clone(),
    };
    let Some(result) = Engine::new(&provider).find_best_path(&query) else {
        return Ok(Json(FindPathResponse::NoPath));
    };

    let steps = hydrate_steps(&state, &result).await;

    Ok(Json(FindPathResponse::Found {
        path: result.path,
        steps,
        total_cost: result.total_cost,
        total_time_hours: result.total_time_hours,
        warnings: result.warnings,
    }))
}

/// Plan per-hop transfer amounts for a previously found path.
async fn plan_amounts(
    State(state): State<AppState>,
    Json(req): Json<PlanAmountsRequest>,
) -> Result<Json<PlanAmountsResponse>, AppError> {
    let edges = state.store.transfer_edges().await?;
    let graph = TransferGraph::build(&edges);

    let Some(steps) = plan_transfer_amounts(&graph, &req.path, req.points_needed) else {
        return Ok(Json(PlanAmountsResponse::StalePath));
    };

    Ok(Json(PlanAmountsResponse::Planned {
        steps: steps.iter().map(TransferStepResult::from_step).collect(),
    }))
}

/// Resolve which programs can book the whole itinerary and whether the
/// user's balances cover them.
async fn bookability(
    State(state): State<AppState>,
    Json(req): Json<BookabilityRequest>,
) -> Result<Json<BookabilityResponse>, AppError> {
    let itinerary: Itinerary = req.itinerary.into();

    // Balance fetch failures leave every option visible but unbookable
    let balances = match state.store.user_point_balances(&req.user_id).await {
        Ok(balances) => balances,
        Err(e) => {
            warn!(error = %e, user_id = %req.user_id, "balance fetch failed, treating as empty");
            HashMap::new()
        }
    };

    let options = resolve_itinerary_bookability(&itinerary, &balances);
    Ok(Json(BookabilityResponse { options }))
}

/// Hydrate the hops of a found path with program names and edge details
/// for display.
async fn hydrate_steps(state: &AppState, result: &PathResult) -> Vec<PathStep> {
    // The engine just searched these same cached edges; a miss here only
    // happens across a TTL boundary and degrades to bare ids.
    let graph = match state.store.transfer_edges().await {
        Ok(edges) => TransferGraph::build(&edges),
        Err(_) => TransferGraph::default(),
    };

    let mut steps = Vec::with_capacity(result.hops());
    for pair in result.path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let edge = graph.edge(from, to);

        steps.push(PathStep {
            from_program_id: from,
            from_program_name: state.directory.display_name(from).await,
            to_program_id: to,
            to_program_name: state.directory.display_name(to).await,
            ratio: edge
                .map(|e| e.ratio_display.clone())
                .unwrap_or_else(|| "1:1".to_string()),
            transfer_time_hours: edge.map(|e| e.transfer_time_hours).unwrap_or(0.0),
        });
    }
    steps
}

/// Edge source backed by the cached store.
///
/// The engine is synchronous; this adapter bridges it onto the async
/// store client.
struct CachedEdgeSource {
    store: Arc<CachedStore>,
}

impl EdgeSource for CachedEdgeSource {
    fn transfer_edges(&self) -> Result<Vec<TransferEdge>, EdgeFetchError> {
        tokio::task::block_in_place(|| {
            let rt = tokio::runtime::Handle::current();
            rt.block_on(async {
                let edges = self
                    .store
                    .transfer_edges()
                    .await
                    .map_err(|e| EdgeFetchError(e.to_string()))?;
                Ok(edges.as_ref().clone())
            })
        })
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
