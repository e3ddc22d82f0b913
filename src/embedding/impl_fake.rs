use crate::embedding::interface::{EmbeddingModel, ModelError};
use image::DynamicImage;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Deterministic stand-in for the CLIP model. Image calls always return the
/// programmed score vector; text calls pop programmed responses in order,
/// falling back to the image scores when the queue is empty.
pub struct EmbeddingModelFake {
    image_scores: Vec<f32>,
    text_responses: Mutex<VecDeque<Vec<f32>>>,
    failure: Option<String>,
}

impl EmbeddingModelFake {
    pub fn with_image_scores(scores: Vec<f32>) -> Self {
        Self {
            image_scores: scores,
            text_responses: Mutex::new(VecDeque::new()),
            failure: None,
        }
    }

    pub fn with_text_responses(responses: Vec<Vec<f32>>) -> Self {
        Self {
            image_scores: Vec::new(),
            text_responses: Mutex::new(responses.into()),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            image_scores: Vec::new(),
            text_responses: Mutex::new(VecDeque::new()),
            failure: Some(message.to_string()),
        }
    }
}

impl EmbeddingModel for EmbeddingModelFake {
    fn score_image(
        &self,
        _image: &DynamicImage,
        _phrases: &[String],
    ) -> Result<Vec<f32>, ModelError> {
        if let Some(message) = &self.failure {
            return Err(ModelError::Inference(message.clone()));
        }
        Ok(self.image_scores.clone())
    }

    fn score_text(&self, _text: &str, _phrases: &[String]) -> Result<Vec<f32>, ModelError> {
        if let Some(message) = &self.failure {
            return Err(ModelError::Inference(message.clone()));
        }
        let mut responses = self
            .text_responses
            .lock()
            .map_err(|_| ModelError::Inference("fake response queue poisoned".to_string()))?;
        Ok(responses.pop_front().unwrap_or_else(|| self.image_scores.clone()))
    }
}
