use crate::analyzer::IncidentAnalyzer;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub mod error;
pub mod routes;


// Photo uploads from phones regularly exceed axum's 2 MiB default.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub const MODEL_NAME: &str = "clip-vit-base-patch32";

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<IncidentAnalyzer>,
}

pub fn routes(analyzer: Arc<IncidentAnalyzer>) -> Router {
    Router::new()
        .route("/analyze-image", post(routes::analyze_image))
        .route("/analyze-issue", post(routes::analyze_issue))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(AppState { analyzer })
}
