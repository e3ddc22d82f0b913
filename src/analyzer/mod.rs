use crate::catalog::{IncidentType, Severity};
use crate::embedding::interface::{EmbeddingModel, ModelError};
use crate::error::AnalyzeError;
use image::DynamicImage;
use serde::Serialize;
use std::sync::Arc;

#[cfg(test)]
mod test;

pub const SUGGESTION: &str = "Please verify if the detected issue matches what you see.";

const ALTERNATIVE_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub incident_type: IncidentType,
    pub confidence: f64,
    pub alternatives: Vec<Alternative>,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub issue_type: IncidentType,
    pub severity: Severity,
    pub confidence: f64,
}

/// Orchestrates decode, prompt construction, scoring, ranking, and response
/// assembly on top of a shared embedding model.
pub struct IncidentAnalyzer {
    model: Arc<dyn EmbeddingModel + Send + Sync>,
}

impl IncidentAnalyzer {
    pub fn new(model: Arc<dyn EmbeddingModel + Send + Sync>) -> Self {
        Self { model }
    }

    pub fn analyze_image(&self, raw_bytes: &[u8]) -> Result<AnalysisResult, AnalyzeError> {
        let decoded = image::load_from_memory(raw_bytes)?;
        let image = DynamicImage::ImageRgb8(decoded.to_rgb8());

        let phrases = IncidentType::prompt_phrases();
        let scores = self.model.score_image(&image, &phrases)?;
        let ranked = rank_incidents(&scores)?;

        Ok(assemble_result(&ranked))
    }

    pub fn analyze_text(&self, text: &str) -> Result<TextAnalysis, AnalyzeError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AnalyzeError::ModelInference(ModelError::Inference(
                "empty issue text".to_string(),
            )));
        }

        let category_scores = self
            .model
            .score_text(text, &IncidentType::prompt_phrases())?;
        let ranked = rank_incidents(&category_scores)?;
        let (issue_type, probability) = ranked[0];

        let severity_scores = self.model.score_text(text, &Severity::prompt_phrases())?;
        let severity = top_severity(&severity_scores)?;

        Ok(TextAnalysis {
            issue_type,
            severity,
            confidence: to_confidence(probability),
        })
    }
}

/// Build the response from an already-ranked candidate list: entry 0 becomes
/// the primary prediction, the next entries (up to two, fewer if the list is
/// shorter) become the alternatives.
fn assemble_result(ranked: &[(IncidentType, f64)]) -> AnalysisResult {
    let (primary_type, primary_probability) = ranked[0];
    let alternatives = ranked
        .iter()
        .skip(1)
        .take(ALTERNATIVE_COUNT)
        .map(|&(incident_type, probability)| Alternative {
            incident_type,
            confidence: to_confidence(probability),
        })
        .collect();

    AnalysisResult {
        incident_type: primary_type,
        confidence: to_confidence(primary_probability),
        alternatives,
        suggestion: SUGGESTION,
    }
}

/// Softmax the raw scores and pair each probability with its catalog entry,
/// sorted by descending probability with catalog index as the tie-break.
fn rank_incidents(scores: &[f32]) -> Result<Vec<(IncidentType, f64)>, AnalyzeError> {
    let probabilities = probabilities(scores, IncidentType::ALL.len())?;

    let mut ranked: Vec<(usize, IncidentType, f64)> = IncidentType::ALL
        .iter()
        .zip(&probabilities)
        .enumerate()
        .map(|(index, (&incident_type, &probability))| (index, incident_type, probability))
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

    Ok(ranked
        .into_iter()
        .map(|(_, incident_type, probability)| (incident_type, probability))
        .collect())
}

fn top_severity(scores: &[f32]) -> Result<Severity, AnalyzeError> {
    let probabilities = probabilities(scores, Severity::ALL.len())?;

    let mut ranked: Vec<(usize, Severity, f64)> = Severity::ALL
        .iter()
        .zip(&probabilities)
        .enumerate()
        .map(|(index, (&severity, &probability))| (index, severity, probability))
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

    Ok(ranked[0].1)
}

fn probabilities(scores: &[f32], expected: usize) -> Result<Vec<f64>, AnalyzeError> {
    if scores.len() != expected {
        return Err(AnalyzeError::CatalogConsistency {
            expected,
            got: scores.len(),
        });
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(AnalyzeError::ModelInference(ModelError::Inference(
            "model returned a non-finite score".to_string(),
        )));
    }
    Ok(softmax(scores))
}

/// Single-row softmax in f64, with the row max subtracted before
/// exponentiating so large scores cannot overflow.
fn softmax(scores: &[f32]) -> Vec<f64> {
    let max = scores
        .iter()
        .fold(f64::NEG_INFINITY, |max, &s| max.max(s as f64));
    let exps: Vec<f64> = scores.iter().map(|&s| (s as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Probability → percentage with two decimals, rounding halves up.
fn to_confidence(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}
