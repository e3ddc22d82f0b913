use crate::embedding::interface::ModelError;
use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// CLIP encodes text as a fixed window of 77 token ids.
pub const CONTEXT_LENGTH: usize = 77;

// "<|endoftext|>" in the CLIP BPE vocabulary, also used as padding.
const EOT_TOKEN_ID: u32 = 49407;
const EOT_TOKEN: &str = "<|endoftext|>";

pub fn load_tokenizer(path: &Path) -> Result<Tokenizer, ModelError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| ModelError::Load(e.to_string()))?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(CONTEXT_LENGTH),
        pad_id: EOT_TOKEN_ID,
        pad_token: EOT_TOKEN.to_string(),
        ..PaddingParams::default()
    }));

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: CONTEXT_LENGTH,
            ..TruncationParams::default()
        }))
        .map_err(|e| ModelError::Load(e.to_string()))?;

    Ok(tokenizer)
}

/// Encode one phrase into `(ids, attention_mask)`, both exactly
/// `CONTEXT_LENGTH` long.
pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<(Vec<i64>, Vec<i64>), ModelError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| ModelError::Tokenize(e.to_string()))?;

    let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();

    if ids.len() != CONTEXT_LENGTH || mask.len() != CONTEXT_LENGTH {
        return Err(ModelError::Tokenize(format!(
            "expected {} ids, got {}",
            CONTEXT_LENGTH,
            ids.len()
        )));
    }

    Ok((ids, mask))
}
