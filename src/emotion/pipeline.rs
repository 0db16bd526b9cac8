use uuid::Uuid;

use crate::emotion::config::EmotionConfig;
use crate::emotion::features::{FaceFeatures, FeatureExtractor, RegionDetector};
use crate::emotion::frame::Frame;
use crate::emotion::history::EmotionHistory;
use crate::emotion::monitoring;
use crate::emotion::scorer::{EmotionScorer, Jitter};
use crate::emotion::stabilizer::TemporalStabilizer;
use crate::emotion::suggestions;
use crate::emotion::types::{Emotion, EmotionResult, HistoryStatistics, Suggestion, Trend};
use crate::error::{EmotionError, Result};

pub struct DetectorSet {
    pub face: Box<dyn RegionDetector>,
    pub smile: Box<dyn RegionDetector>,
    pub eye: Box<dyn RegionDetector>,
}

/// 单会话管线：特征提取 → 评分 → 稳定 → 历史分析，每个被观察对象一个实例
pub struct EmotionPipeline {
    session_id: Uuid,
    extractor: FeatureExtractor,
    scorer: EmotionScorer,
    stabilizer: TemporalStabilizer,
    history: EmotionHistory,
    persistence_threshold: f64,
}

impl EmotionPipeline {
    pub fn new(config: EmotionConfig, detectors: DetectorSet, jitter: Box<dyn Jitter>) -> Result<Self> {
        config.validate().map_err(EmotionError::InvalidConfig)?;

        let surprise_ratio = config.extractor.surprise_eye_area_ratio;
        let extractor = FeatureExtractor::new(
            detectors.face,
            detectors.smile,
            detectors.eye,
            config.extractor.clone(),
        )?;
        let session_id = Uuid::new_v4();

        tracing::info!(
            %session_id,
            stabilizer_window = config.stabilizer.window,
            history_capacity = config.history.capacity,
            "Emotion pipeline created"
        );

        Ok(Self {
            session_id,
            extractor,
            scorer: EmotionScorer::new(config.scorer, surprise_ratio, jitter),
            stabilizer: TemporalStabilizer::new(&config.stabilizer),
            history: EmotionHistory::new(&config.history),
            persistence_threshold: config.history.persistence_threshold,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// 未检测到人脸或帧格式错误时返回 `None`，稳定缓冲区不变
    pub fn process_frame(&mut self, frame: &Frame) -> Option<EmotionResult> {
        let Some(features) = self.extractor.extract(frame) else {
            tracing::trace!(session_id = %self.session_id, "No face in frame");
            return None;
        };
        Some(self.process_features(&features))
    }

    pub fn process_features(&mut self, features: &FaceFeatures) -> EmotionResult {
        let score = self.scorer.score(&features.signals());
        let stabilized = self.stabilizer.push(score.dominant);

        let result = EmotionResult::new(
            stabilized,
            score.confidence,
            score.distribution,
            Some(features.face),
        );
        monitoring::report(&result);

        tracing::debug!(
            session_id = %self.session_id,
            raw = %score.dominant,
            stabilized = %stabilized,
            confidence = score.confidence,
            "Frame processed"
        );
        result
    }

    pub fn record_to_history(&mut self, result: EmotionResult) {
        self.history.record(result);
    }

    pub fn dominant_emotion(&self) -> Option<Emotion> {
        self.history.dominant_emotion()
    }

    pub fn trend(&self) -> Trend {
        self.history.trend()
    }

    pub fn is_persistent(&self, emotion: Emotion, threshold: f64) -> bool {
        self.history.is_persistent(emotion, threshold)
    }

    pub fn suggestions(&self) -> Suggestion {
        let dominant = self.history.dominant_emotion();
        let sadness_persistent = self
            .history
            .is_persistent(Emotion::Sad, self.persistence_threshold);
        suggestions::build(dominant, self.history.trend(), sadness_persistent)
    }

    pub fn statistics(&self) -> HistoryStatistics {
        self.history.statistics()
    }

    pub fn history(&self) -> &EmotionHistory {
        &self.history
    }

    pub fn stabilizer(&self) -> &TemporalStabilizer {
        &self.stabilizer
    }

    /// 同时清空稳定缓冲区和历史
    pub fn clear_history(&mut self) {
        self.stabilizer.clear();
        self.history.clear();
        tracing::info!(session_id = %self.session_id, "Emotion history cleared");
    }
}
