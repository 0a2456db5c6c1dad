use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{Company, ComparisonResult};
use crate::routes::macro_trends::QuarterQuery;
use crate::services::comparison_service;
use crate::state::AppState;
use crate::store::load_directory_records;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies))
        .route("/:ticker/comparison", get(get_comparison))
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub comparison: ComparisonResult,
    pub generated_at: DateTime<Utc>,
}

async fn list_companies(State(state): State<AppState>) -> Json<Vec<Company>> {
    Json(state.directory.all().to_vec())
}

/// GET /api/companies/:ticker/comparison?quarter=Q4%202024
async fn get_comparison(
    Path(ticker): Path<String>,
    Query(params): Query<QuarterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ComparisonResponse>, AppError> {
    if state.directory.get(&ticker).is_none() {
        return Err(AppError::NotFound);
    }

    let records = load_directory_records(&state.directory, state.source.as_ref()).await?;
    let comparison = comparison_service::get_sector_comparison(
        &ticker,
        &state.directory,
        &records,
        params.quarter.as_deref(),
    )
    .ok_or(AppError::NotFound)?;

    info!(
        "Comparison for {} in {}: sector rank {}/{}",
        comparison.company.ticker,
        comparison.quarter,
        comparison.in_sector.rank,
        comparison.in_sector.total
    );

    Ok(Json(ComparisonResponse {
        comparison,
        generated_at: Utc::now(),
    }))
}
