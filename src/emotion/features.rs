use serde::{Deserialize, Serialize};

use crate::emotion::config::{DetectionParams, ExtractorConfig};
use crate::emotion::frame::{Frame, GrayImage};
use crate::emotion::types::FaceBox;
use crate::error::{EmotionError, Result};

/// 级联式区域检测器，返回图像坐标系下的候选矩形
pub trait RegionDetector: Send {
    fn name(&self) -> &str;

    fn is_loaded(&self) -> bool {
        true
    }

    fn detect(&mut self, image: &GrayImage, params: &DetectionParams) -> Result<Vec<FaceBox>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceFeatures {
    pub face: FaceBox,
    /// 相对人脸区域的坐标
    pub smiles: Vec<FaceBox>,
    /// 相对人脸区域的坐标
    pub eyes: Vec<FaceBox>,
}

impl FaceFeatures {
    pub fn signals(&self) -> FeatureSignals {
        let face_area = self.face.area();
        let eye_area_ratio = if self.eyes.is_empty() || face_area <= 0 {
            0.0
        } else {
            let total: i64 = self.eyes.iter().map(FaceBox::area).sum();
            let avg = total as f64 / self.eyes.len() as f64;
            avg / face_area as f64
        };

        FeatureSignals {
            smile_detected: !self.smiles.is_empty(),
            eye_count: self.eyes.len(),
            eye_area_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSignals {
    pub smile_detected: bool,
    pub eye_count: usize,
    /// 眼睛平均面积 / 人脸面积
    pub eye_area_ratio: f64,
}

pub struct FeatureExtractor {
    face_detector: Box<dyn RegionDetector>,
    smile_detector: Box<dyn RegionDetector>,
    eye_detector: Box<dyn RegionDetector>,
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(
        face_detector: Box<dyn RegionDetector>,
        smile_detector: Box<dyn RegionDetector>,
        eye_detector: Box<dyn RegionDetector>,
        config: ExtractorConfig,
    ) -> Result<Self> {
        for detector in [&face_detector, &smile_detector, &eye_detector] {
            if !detector.is_loaded() {
                tracing::error!(detector = detector.name(), "Detector is not loaded");
                return Err(EmotionError::DetectorUnavailable {
                    detector: detector.name().to_string(),
                    reason: "detector reports no trained data".to_string(),
                });
            }
        }

        tracing::info!(
            face = face_detector.name(),
            smile = smile_detector.name(),
            eye = eye_detector.name(),
            "Feature extractor initialized"
        );

        Ok(Self {
            face_detector,
            smile_detector,
            eye_detector,
            config,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&mut self, frame: &Frame) -> Option<FaceFeatures> {
        let gray = frame.to_gray()?;

        let faces = match self.face_detector.detect(&gray, &self.config.face) {
            Ok(faces) => faces,
            Err(e) => {
                tracing::warn!(error = %e, detector = self.face_detector.name(), "Face detection failed");
                return None;
            }
        };

        let face = select_largest(&faces)?;
        let roi = gray.crop(&face)?;

        let smiles = match self.smile_detector.detect(&roi, &self.config.smile) {
            Ok(smiles) => smiles,
            Err(e) => {
                tracing::warn!(error = %e, detector = self.smile_detector.name(), "Smile detection failed");
                return None;
            }
        };
        let eyes = match self.eye_detector.detect(&roi, &self.config.eye) {
            Ok(eyes) => eyes,
            Err(e) => {
                tracing::warn!(error = %e, detector = self.eye_detector.name(), "Eye detection failed");
                return None;
            }
        };

        Some(FaceFeatures { face, smiles, eyes })
    }
}

/// 取面积最大的人脸，面积相同按检测器返回顺序
pub fn select_largest(faces: &[FaceBox]) -> Option<FaceBox> {
    let mut iter = faces.iter();
    let mut best = *iter.next()?;
    for face in iter {
        if face.area() > best.area() {
            best = *face;
        }
    }
    Some(best)
}
