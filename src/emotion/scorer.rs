use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::emotion::config::{ScoreBand, ScorerConfig};
use crate::emotion::features::FeatureSignals;
use crate::emotion::types::{Emotion, EmotionDistribution};

pub trait Jitter: Send {
    /// 返回 `[0, max]` 内的值
    fn sample(&mut self, max: f64) -> f64;
}

pub struct RandomJitter<R: Rng + Send> {
    rng: R,
}

impl<R: Rng + Send> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomJitter<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> Jitter for RandomJitter<R> {
    fn sample(&mut self, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..=max)
    }
}

/// 恒为 0，所有分段取基准值
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self, _max: f64) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScore {
    pub distribution: EmotionDistribution,
    pub dominant: Emotion,
    pub confidence: f64,
}

pub struct EmotionScorer {
    config: ScorerConfig,
    surprise_eye_area_ratio: f64,
    jitter: Box<dyn Jitter>,
}

impl EmotionScorer {
    pub fn new(config: ScorerConfig, surprise_eye_area_ratio: f64, jitter: Box<dyn Jitter>) -> Self {
        Self {
            config,
            surprise_eye_area_ratio,
            jitter,
        }
    }

    pub fn score(&mut self, signals: &FeatureSignals) -> FrameScore {
        let raw = self.raw_scores(signals);
        let distribution = raw.normalized();
        let (dominant, confidence) = distribution.dominant();
        FrameScore {
            distribution,
            dominant,
            confidence,
        }
    }

    // 规则按顺序执行：
    // 1. 基线先验（neutral 最高）
    // 2. 笑容：happy 进入高分段，neutral / sad 压低
    // 3. 眼睛数 >= 2 且平均眼睛面积占比超过阈值：surprise 提升
    // 4. 眼睛数 < 2 且无笑容：angry 和 sad 同时提升
    // 5. 无笑容、眼睛数 >= 2 且规则 3 未触发：neutral 提升
    fn raw_scores(&mut self, signals: &FeatureSignals) -> EmotionDistribution {
        let priors = &self.config.priors;
        let mut scores = EmotionDistribution {
            happy: priors.happy,
            sad: priors.sad,
            angry: priors.angry,
            neutral: priors.neutral,
            surprise: priors.surprise,
            fear: priors.fear,
            disgust: priors.disgust,
        };

        if signals.smile_detected {
            let happy = self.band(self.config.smile_happy);
            scores.set(Emotion::Happy, happy);
            scores.set(Emotion::Neutral, self.config.smile_neutral);
            scores.set(Emotion::Sad, self.config.smile_sad);
        }

        let mut wide_eyes = false;
        if signals.eye_count >= 2 {
            if signals.eye_area_ratio > self.surprise_eye_area_ratio {
                wide_eyes = true;
                let surprise = self.band(self.config.wide_eyes_surprise);
                scores.raise(Emotion::Surprise, surprise);
            }
        } else if !signals.smile_detected {
            let angry = self.band(self.config.closed_eyes_angry);
            scores.raise(Emotion::Angry, angry);
            let sad = self.band(self.config.closed_eyes_sad);
            scores.raise(Emotion::Sad, sad);
        }

        if !signals.smile_detected && signals.eye_count >= 2 && !wide_eyes {
            let neutral = self.band(self.config.calm_neutral);
            scores.raise(Emotion::Neutral, neutral);
        }

        scores
    }

    fn band(&mut self, band: ScoreBand) -> f64 {
        band.base + self.jitter.sample(band.jitter).clamp(0.0, band.jitter)
    }
}
