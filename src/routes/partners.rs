use axum::extract::Query;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{NormalizedPartner, PartnerAudit, PartnerAuditRequest};
use crate::services::partner_normalizer;
use crate::state::AppState;

/// Upper bound on names accepted by one audit request
const MAX_AUDIT_NAMES: usize = 1000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/normalize", get(normalize))
        .route("/audit", post(audit))
}

#[derive(Debug, Deserialize)]
struct NormalizeQuery {
    name: Option<String>,
}

/// GET /api/partners/normalize?name=Microsoft%20Corp
async fn normalize(Query(params): Query<NormalizeQuery>) -> Result<Json<NormalizedPartner>, AppError> {
    let raw = params
        .name
        .ok_or_else(|| AppError::Validation("Missing 'name' query parameter".to_string()))?;

    Ok(Json(NormalizedPartner {
        canonical: partner_normalizer::normalize_partner_name(&raw),
        raw,
    }))
}

/// POST /api/partners/audit
async fn audit(Json(request): Json<PartnerAuditRequest>) -> Result<Json<PartnerAudit>, AppError> {
    if request.names.len() > MAX_AUDIT_NAMES {
        return Err(format!(
            "Too many names: {} (max {})",
            request.names.len(),
            MAX_AUDIT_NAMES
        )
        .into());
    }

    let audit = partner_normalizer::audit_partner_names(&request.names);
    info!(
        "Partner audit: {} kept, {} discarded, {} distinct",
        audit.kept,
        audit.discarded,
        audit.canonical_names.len()
    );
    Ok(Json(audit))
}
