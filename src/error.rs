use crate::embedding::interface::ModelError;
use thiserror::Error;

/// Failures the analyzer can report. The HTTP boundary never forwards these
/// messages to the caller; they are logged operator-side only.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("failed to decode uploaded image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("embedding model failure: {0}")]
    ModelInference(#[from] ModelError),

    #[error("model returned {got} scores for {expected} candidate phrases")]
    CatalogConsistency { expected: usize, got: usize },
}
