use crate::embedding::clip::image::{image_to_clip_tensor, INPUT_SIZE};
use crate::embedding::clip::text::{encode, load_tokenizer, CONTEXT_LENGTH};
use crate::embedding::interface::{EmbeddingModel, ModelError};
use image::DynamicImage;
use std::path::PathBuf;
use tokenizers::Tokenizer;
use tract_onnx::prelude::*;

// Trained CLIP temperature applied to cosine similarities, reproducing the
// model's logits_per_image row for a single image.
const LOGIT_SCALE: f32 = 100.0;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

#[derive(Debug, Clone, PartialEq)]
pub struct ClipModelConfig {
    pub visual_model_path: PathBuf,
    pub text_model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// CLIP ViT-B/32 executed through tract: one ONNX graph per tower plus the
/// BPE tokenizer. Loaded once at startup and shared across requests.
pub struct EmbeddingModelClipOnnx {
    visual: Plan,
    text: Plan,
    tokenizer: Tokenizer,
}

impl EmbeddingModelClipOnnx {
    pub fn new(config: &ClipModelConfig) -> Result<Self, ModelError> {
        let size = INPUT_SIZE as usize;
        let visual = tract_onnx::onnx()
            .model_for_path(&config.visual_model_path)
            .and_then(|m| {
                m.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
                )
            })
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ModelError::Load(e.to_string()))?;

        let window = CONTEXT_LENGTH;
        let text = tract_onnx::onnx()
            .model_for_path(&config.text_model_path)
            .and_then(|m| {
                m.with_input_fact(
                    0,
                    InferenceFact::dt_shape(i64::datum_type(), tvec!(1, window)),
                )
            })
            .and_then(|m| {
                m.with_input_fact(
                    1,
                    InferenceFact::dt_shape(i64::datum_type(), tvec!(1, window)),
                )
            })
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ModelError::Load(e.to_string()))?;

        let tokenizer = load_tokenizer(&config.tokenizer_path)?;

        Ok(Self {
            visual,
            text,
            tokenizer,
        })
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>, ModelError> {
        let input = image_to_clip_tensor(image)?;
        let outputs = self
            .visual
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        embedding_from_output(&outputs)
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let (ids, mask) = encode(&self.tokenizer, text)?;

        let ids: Tensor = tract_ndarray::Array2::from_shape_vec((1, CONTEXT_LENGTH), ids)
            .map_err(|e| ModelError::Inference(e.to_string()))?
            .into();
        let mask: Tensor = tract_ndarray::Array2::from_shape_vec((1, CONTEXT_LENGTH), mask)
            .map_err(|e| ModelError::Inference(e.to_string()))?
            .into();

        let outputs = self
            .text
            .run(tvec!(ids.into_tvalue(), mask.into_tvalue()))
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        embedding_from_output(&outputs)
    }

    fn scores_against_phrases(
        &self,
        query: &[f32],
        phrases: &[String],
    ) -> Result<Vec<f32>, ModelError> {
        let query = l2_normalize(query);
        let mut scores = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let phrase_embedding = l2_normalize(&self.embed_text(phrase)?);
            scores.push(LOGIT_SCALE * cosine(&query, &phrase_embedding)?);
        }
        Ok(scores)
    }
}

impl EmbeddingModel for EmbeddingModelClipOnnx {
    fn score_image(
        &self,
        image: &DynamicImage,
        phrases: &[String],
    ) -> Result<Vec<f32>, ModelError> {
        let image_embedding = self.embed_image(image)?;
        self.scores_against_phrases(&image_embedding, phrases)
    }

    fn score_text(&self, text: &str, phrases: &[String]) -> Result<Vec<f32>, ModelError> {
        let text_embedding = self.embed_text(text)?;
        self.scores_against_phrases(&text_embedding, phrases)
    }
}

fn embedding_from_output(outputs: &TVec<TValue>) -> Result<Vec<f32>, ModelError> {
    let output = outputs
        .first()
        .ok_or_else(|| ModelError::Inference("model produced no output".to_string()))?;
    let view = output
        .to_array_view::<f32>()
        .map_err(|e| ModelError::Inference(e.to_string()))?;
    Ok(view.iter().copied().collect())
}

/// Dot product of two unit vectors. The towers must agree on embedding
/// width; a mismatch is a model fault, never silently truncated.
fn cosine(a: &[f32], b: &[f32]) -> Result<f32, ModelError> {
    if a.len() != b.len() {
        return Err(ModelError::Inference(format!(
            "embedding width mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}
