use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load model: {0}")]
    Load(String),

    #[error("failed to tokenize text: {0}")]
    Tokenize(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// A joint image/text embedding model used for zero-shot classification.
///
/// Both operations take N candidate phrases and return N raw compatibility
/// scores in the same order. Implementations hold no per-request mutable
/// state; a loaded model is shared across requests behind an `Arc`.
pub trait EmbeddingModel {
    fn score_image(&self, image: &DynamicImage, phrases: &[String]) -> Result<Vec<f32>, ModelError>;

    fn score_text(&self, text: &str, phrases: &[String]) -> Result<Vec<f32>, ModelError>;
}
