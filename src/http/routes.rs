use crate::analyzer::{AnalysisResult, TextAnalysis};
use crate::http::error::ApiError;
use crate::http::{AppState, MODEL_NAME};
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub text: String,
}

pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let bytes = read_upload(&mut multipart).await?;

    let analyzer = state.analyzer.clone();
    let result = tokio::task::spawn_blocking(move || analyzer.analyze_image(&bytes))
        .await
        .map_err(|e| {
            tracing::error!("image analysis task failed: {e}");
            ApiError::image_analysis()
        })?
        .map_err(|e| {
            tracing::warn!("image analysis failed: {e}");
            ApiError::image_analysis()
        })?;

    tracing::debug!(
        incident_type = result.incident_type.identifier(),
        confidence = result.confidence,
        "image analyzed"
    );
    Ok(Json(result))
}

pub async fn analyze_issue(
    State(state): State<AppState>,
    Json(request): Json<IssueRequest>,
) -> Result<Json<TextAnalysis>, ApiError> {
    let analyzer = state.analyzer.clone();
    let result = tokio::task::spawn_blocking(move || analyzer.analyze_text(&request.text))
        .await
        .map_err(|e| {
            tracing::error!("issue analysis task failed: {e}");
            ApiError::text_analysis()
        })?
        .map_err(|e| {
            tracing::warn!("issue analysis failed: {e}");
            ApiError::text_analysis()
        })?;

    tracing::debug!(
        issue_type = result.issue_type.identifier(),
        severity = result.severity.label(),
        "issue analyzed"
    );
    Ok(Json(result))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "model": MODEL_NAME }))
}

/// Pull the uploaded image out of the multipart body: the field named `file`
/// wins, otherwise the first field present.
async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    let mut first: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("unreadable multipart body: {e}");
        ApiError::missing_upload()
    })? {
        let is_file_field = field.name() == Some("file");
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("failed to read multipart field: {e}");
            ApiError::missing_upload()
        })?;

        if is_file_field {
            return Ok(data);
        }
        if first.is_none() {
            first = Some(data);
        }
    }

    first.ok_or_else(ApiError::missing_upload)
}
