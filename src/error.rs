use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output write failed: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
