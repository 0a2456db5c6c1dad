use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::MacroAnalysis;
use crate::services::{macro_service, quarter_selector};
use crate::state::AppState;
use crate::store::load_directory_records;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_macro_analysis))
        .route("/quarters", get(get_quarters))
}

/// Query parameters shared by the period-scoped endpoints
#[derive(Debug, Deserialize)]
pub struct QuarterQuery {
    /// Period label such as "Q4 2024"; latest available when omitted
    pub quarter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MacroTrendsResponse {
    pub analysis: MacroAnalysis,
    pub available_quarters: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/macro?quarter=Q4%202024
async fn get_macro_analysis(
    Query(params): Query<QuarterQuery>,
    State(state): State<AppState>,
) -> Result<Json<MacroTrendsResponse>, AppError> {
    let records = load_directory_records(&state.directory, state.source.as_ref()).await?;
    let analysis = macro_service::compute_macro_analysis(&records, params.quarter.as_deref());

    info!(
        "Macro analysis for {}: {} companies, {} partners, themes={:?}",
        analysis.quarter,
        analysis.company_count(),
        analysis.partnership_network.len(),
        analysis.top_themes
    );

    Ok(Json(MacroTrendsResponse {
        available_quarters: quarter_selector::available_quarters(&records),
        analysis,
        generated_at: Utc::now(),
    }))
}

/// GET /api/macro/quarters
async fn get_quarters(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let records = load_directory_records(&state.directory, state.source.as_ref()).await?;
    Ok(Json(quarter_selector::available_quarters(&records)))
}
