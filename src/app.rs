use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{companies, health, macro_trends, partners};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/macro", macro_trends::router())
        .nest("/api/companies", companies::router())
        .nest("/api/partners", partners::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
