use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PERSISTENCE_THRESHOLD, HISTORY_CAPACITY, STABILIZER_MIN_VOTES, STABILIZER_WINDOW,
    SURPRISE_EYE_AREA_RATIO, TREND_THRESHOLD,
};
use crate::error::{EmotionError, Result};

/// 对应 `detectMultiScale` 的参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// 最小检测尺寸（正方形边长，像素）
    pub min_size: i32,
}

impl DetectionParams {
    pub const fn new(scale_factor: f64, min_neighbors: i32, min_size: i32) -> Self {
        Self {
            scale_factor,
            min_neighbors,
            min_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorConfig {
    pub face: DetectionParams,
    pub smile: DetectionParams,
    pub eye: DetectionParams,
    /// 眼睛平均面积 / 人脸面积 超过此比例时触发惊讶规则
    #[serde(default = "default_surprise_eye_area_ratio")]
    pub surprise_eye_area_ratio: f64,
}

fn default_surprise_eye_area_ratio() -> f64 {
    SURPRISE_EYE_AREA_RATIO
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            face: DetectionParams::new(1.1, 5, 60),
            smile: DetectionParams::new(1.5, 15, 25),
            eye: DetectionParams::new(1.1, 5, 20),
            surprise_eye_area_ratio: SURPRISE_EYE_AREA_RATIO,
        }
    }
}

/// 分段得分：`base` 加上不超过 `jitter` 的随机扰动
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBand {
    pub base: f64,
    pub jitter: f64,
}

impl ScoreBand {
    pub const fn new(base: f64, jitter: f64) -> Self {
        Self { base, jitter }
    }

    pub const fn fixed(base: f64) -> Self {
        Self { base, jitter: 0.0 }
    }

    pub fn upper(&self) -> f64 {
        self.base + self.jitter
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorConfig {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub neutral: f64,
    pub surprise: f64,
    pub fear: f64,
    pub disgust: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            happy: 0.15,
            sad: 0.15,
            angry: 0.15,
            neutral: 0.25,
            surprise: 0.10,
            fear: 0.10,
            disgust: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorerConfig {
    pub priors: PriorConfig,
    pub smile_happy: ScoreBand,
    pub smile_neutral: f64,
    pub smile_sad: f64,
    pub wide_eyes_surprise: ScoreBand,
    pub closed_eyes_angry: ScoreBand,
    pub closed_eyes_sad: ScoreBand,
    pub calm_neutral: ScoreBand,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            priors: PriorConfig::default(),
            smile_happy: ScoreBand::new(0.70, 0.15),
            smile_neutral: 0.10,
            smile_sad: 0.05,
            wide_eyes_surprise: ScoreBand::new(0.40, 0.10),
            closed_eyes_angry: ScoreBand::new(0.35, 0.10),
            closed_eyes_sad: ScoreBand::new(0.30, 0.10),
            calm_neutral: ScoreBand::new(0.50, 0.15),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilizerConfig {
    pub window: usize,
    pub min_votes: usize,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            window: STABILIZER_WINDOW,
            min_votes: STABILIZER_MIN_VOTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    pub capacity: usize,
    pub persistence_threshold: f64,
    /// 趋势判定阈值，可调常量而非统计推导值
    pub trend_threshold: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
            persistence_threshold: DEFAULT_PERSISTENCE_THRESHOLD,
            trend_threshold: TREND_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub stabilizer: StabilizerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl EmotionConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: EmotionConfig = serde_json::from_str(&raw)?;
        config.validate().map_err(EmotionError::InvalidConfig)?;
        tracing::info!(path = %path.as_ref().display(), "Emotion config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        // ExtractorConfig
        for (name, params) in [
            ("face", &self.extractor.face),
            ("smile", &self.extractor.smile),
            ("eye", &self.extractor.eye),
        ] {
            if !params.scale_factor.is_finite() || params.scale_factor <= 1.0 {
                return Err(format!("extractor.{name}.scale_factor must be > 1"));
            }
            if params.min_neighbors < 0 {
                return Err(format!("extractor.{name}.min_neighbors must be >= 0"));
            }
            if params.min_size < 0 {
                return Err(format!("extractor.{name}.min_size must be >= 0"));
            }
        }
        if !(0.0..=1.0).contains(&self.extractor.surprise_eye_area_ratio) {
            return Err("extractor.surprise_eye_area_ratio must be in [0,1]".to_string());
        }

        // ScorerConfig
        let p = &self.scorer.priors;
        for (name, value) in [
            ("happy", p.happy),
            ("sad", p.sad),
            ("angry", p.angry),
            ("neutral", p.neutral),
            ("surprise", p.surprise),
            ("fear", p.fear),
            ("disgust", p.disgust),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("scorer.priors.{name} must be in (0,1]"));
            }
        }
        for (name, band) in [
            ("smile_happy", &self.scorer.smile_happy),
            ("wide_eyes_surprise", &self.scorer.wide_eyes_surprise),
            ("closed_eyes_angry", &self.scorer.closed_eyes_angry),
            ("closed_eyes_sad", &self.scorer.closed_eyes_sad),
            ("calm_neutral", &self.scorer.calm_neutral),
        ] {
            if !band.base.is_finite()
                || !band.jitter.is_finite()
                || band.base < 0.0
                || band.jitter < 0.0
                || band.upper() > 1.0
            {
                return Err(format!(
                    "scorer.{name} must be finite with base >= 0, jitter >= 0, base + jitter <= 1"
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.scorer.smile_neutral) {
            return Err("scorer.smile_neutral must be in [0,1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.scorer.smile_sad) {
            return Err("scorer.smile_sad must be in [0,1]".to_string());
        }

        // StabilizerConfig
        if self.stabilizer.window == 0 {
            return Err("stabilizer.window must be > 0".to_string());
        }
        if self.stabilizer.min_votes == 0 || self.stabilizer.min_votes > self.stabilizer.window {
            return Err("stabilizer.min_votes must be in [1, window]".to_string());
        }

        // HistoryConfig
        if self.history.capacity == 0 {
            return Err("history.capacity must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.history.persistence_threshold) {
            return Err("history.persistence_threshold must be in [0,1]".to_string());
        }
        if !self.history.trend_threshold.is_finite() || self.history.trend_threshold < 0.0 {
            return Err("history.trend_threshold must be finite and >= 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EmotionConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = EmotionConfig::default();
        cfg.stabilizer.min_votes = 6;
        assert!(cfg.validate().is_err());

        let mut cfg = EmotionConfig::default();
        cfg.extractor.smile.scale_factor = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = EmotionConfig::default();
        cfg.scorer.smile_happy = ScoreBand::new(0.9, 0.2);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut cfg = EmotionConfig::default();
        cfg.scorer.calm_neutral = ScoreBand::new(0.5, f64::NAN);
        assert!(cfg.validate().unwrap_err().contains("calm_neutral"));

        let mut cfg = EmotionConfig::default();
        cfg.scorer.wide_eyes_surprise = ScoreBand::new(f64::NAN, 0.1);
        assert!(cfg.validate().is_err());

        let mut cfg = EmotionConfig::default();
        cfg.history.trend_threshold = f64::NAN;
        assert!(cfg.validate().unwrap_err().contains("trend_threshold"));

        let mut cfg = EmotionConfig::default();
        cfg.history.trend_threshold = f64::INFINITY;
        assert!(cfg.validate().is_err());

        let mut cfg = EmotionConfig::default();
        cfg.extractor.eye.scale_factor = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = EmotionConfig::default();
        cfg.scorer.priors.fear = f64::NAN;
        cfg.scorer.smile_sad = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = EmotionConfig::default();
        cfg.history.persistence_threshold = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"history": {{"capacity": 20, "persistenceThreshold": 0.5, "trendThreshold": 0.3}}}}"#)
            .expect("write config");

        let cfg = EmotionConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.history.capacity, 20);
        assert_eq!(cfg.history.trend_threshold, 0.3);
        assert_eq!(cfg.stabilizer.window, 5);
        assert_eq!(cfg.extractor.face.min_size, 60);
    }

    #[test]
    fn invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"stabilizer": {{"window": 0, "minVotes": 0}}}}"#).expect("write config");

        let err = EmotionConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, EmotionError::InvalidConfig(_)));

        let missing = EmotionConfig::from_file("/nonexistent/emotion.json").unwrap_err();
        assert!(matches!(missing, EmotionError::ConfigRead(_)));
    }
}
