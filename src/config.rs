use crate::embedding::impl_clip_onnx::ClipModelConfig;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {variable}: {value}")]
    InvalidValue { variable: &'static str, value: String },

    #[error("model file not found: {0}")]
    MissingModelFile(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_dir: PathBuf::from("models"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let host = env::var("BIND_HOST").unwrap_or(defaults.host);
        let port = match env::var("BIND_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                variable: "BIND_PORT",
                value,
            })?,
            Err(_) => defaults.port,
        };
        let model_dir = env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        Ok(Self {
            host,
            port,
            model_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn clip_model_config(&self) -> ClipModelConfig {
        ClipModelConfig {
            visual_model_path: self.model_dir.join("visual.onnx"),
            text_model_path: self.model_dir.join("text.onnx"),
            tokenizer_path: self.model_dir.join("tokenizer.json"),
        }
    }

    /// The service never serves without its model files in place.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model_config = self.clip_model_config();
        for path in [
            &model_config.visual_model_path,
            &model_config.text_model_path,
            &model_config.tokenizer_path,
        ] {
            if !path.exists() {
                return Err(ConfigError::MissingModelFile(path.clone()));
            }
        }
        Ok(())
    }
}
