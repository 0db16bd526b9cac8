use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_CASCADE_DIR, DEFAULT_SAMPLE_EVERY};
use crate::logging::{LogConfig, LogFormat};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub capture: CaptureConfig,
    /// 可选的算法参数 JSON 文件
    pub emotion_config_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub camera_id: i32,
    pub cascade_dir: PathBuf,
    /// 每隔多少帧处理一帧
    pub sample_every: u64,
    /// 0 表示不限制
    pub max_frames: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let emotion_config_path = env_or("EMOTION_CONFIG_PATH", "");
        Self {
            log_level: env_or("RUST_LOG", "info"),
            log_format: env_or_parse("LOG_FORMAT", LogFormat::Text),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            capture: CaptureConfig {
                camera_id: env_or_parse("CAMERA_ID", 0_i32),
                cascade_dir: PathBuf::from(env_or("CASCADE_DIR", DEFAULT_CASCADE_DIR)),
                sample_every: env_or_parse("SAMPLE_EVERY", DEFAULT_SAMPLE_EVERY).max(1),
                max_frames: env_or_parse("MAX_FRAMES", 0_u64),
            },
            emotion_config_path: if emotion_config_path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(emotion_config_path))
            },
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            format: self.log_format,
            enable_file_logs: self.enable_file_logs,
            log_dir: self.log_dir.clone(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
