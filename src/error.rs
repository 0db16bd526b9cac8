use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmotionError {
    #[error("detector unavailable: detector={detector}, reason={reason}")]
    DetectorUnavailable { detector: String, reason: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config read error: {0}")]
    ConfigRead(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("detection error: {0}")]
    Detection(String),
    #[error("camera error: {0}")]
    Camera(String),
}

pub type Result<T> = std::result::Result<T, EmotionError>;
