use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use crate::controllers::settlement_controller::SettlementController;
use crate::dto::settlement_dto::{
    EligibleTripResponse, EligibleTripsQuery, ProcessSettlementRequest, SettlementHistoryQuery,
    SettlementPreviewResponse, SettlementResponse,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_settlement_router() -> Router<AppState> {
    Router::new()
        .route("/", post(process_settlement).get(list_settlements))
        .route("/preview", post(preview_settlement))
        .route("/eligible/:driver_id", get(eligible_trips))
}

fn controller(state: &AppState) -> SettlementController {
    SettlementController::new(state.ledger.clone(), &state.config.currency_symbol)
}

async fn preview_settlement(
    State(state): State<AppState>,
    payload: Result<Json<ProcessSettlementRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SettlementPreviewResponse>>, AppError> {
    let Json(request) = payload?;
    let response = controller(&state).preview(request).await?;
    Ok(Json(response))
}

async fn process_settlement(
    State(state): State<AppState>,
    payload: Result<Json<ProcessSettlementRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SettlementResponse>>, AppError> {
    let Json(request) = payload?;
    let response = controller(&state).process(request).await?;
    Ok(Json(response))
}

async fn list_settlements(
    State(state): State<AppState>,
    query: Result<Query<SettlementHistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<SettlementResponse>>, AppError> {
    let Query(query) = query?;
    let response = controller(&state).history(query).await?;
    Ok(Json(response))
}

async fn eligible_trips(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
    query: Result<Query<EligibleTripsQuery>, QueryRejection>,
) -> Result<Json<Vec<EligibleTripResponse>>, AppError> {
    let Query(query) = query?;
    let response = controller(&state).eligible_trips(&driver_id, query).await?;
    Ok(Json(response))
}
