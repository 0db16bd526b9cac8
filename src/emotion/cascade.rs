use std::path::Path;

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::constants::{EYE_CASCADE_FILE, FACE_CASCADE_FILE, SMILE_CASCADE_FILE};
use crate::emotion::config::DetectionParams;
use crate::emotion::features::RegionDetector;
use crate::emotion::frame::GrayImage;
use crate::emotion::pipeline::DetectorSet;
use crate::emotion::types::FaceBox;
use crate::error::{EmotionError, Result};

pub struct CascadeDetector {
    name: String,
    classifier: CascadeClassifier,
}

impl CascadeDetector {
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let unavailable = |reason: String| EmotionError::DetectorUnavailable {
            detector: name.to_string(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable(format!("cascade file not found: {}", path.display())));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| unavailable("cascade path is not valid UTF-8".to_string()))?;

        let classifier = CascadeClassifier::new(path_str).map_err(|e| {
            tracing::error!(detector = name, error = %e, "Failed to load Haar cascade");
            unavailable(format!("Haar cascade load failed: {e}"))
        })?;
        if classifier.empty().map_err(|e| unavailable(e.to_string()))? {
            return Err(unavailable("Haar cascade classifier is empty".to_string()));
        }

        tracing::info!(detector = name, path = %path.display(), "Haar cascade loaded");
        Ok(Self {
            name: name.to_string(),
            classifier,
        })
    }

    /// 从目录加载人脸、笑容、眼睛三个 cascade
    pub fn load_set(dir: &Path) -> Result<DetectorSet> {
        Ok(DetectorSet {
            face: Box::new(Self::load("face", &dir.join(FACE_CASCADE_FILE))?),
            smile: Box::new(Self::load("smile", &dir.join(SMILE_CASCADE_FILE))?),
            eye: Box::new(Self::load("eye", &dir.join(EYE_CASCADE_FILE))?),
        })
    }
}

impl RegionDetector for CascadeDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_loaded(&self) -> bool {
        !self.classifier.empty().unwrap_or(true)
    }

    fn detect(&mut self, image: &GrayImage, params: &DetectionParams) -> Result<Vec<FaceBox>> {
        let mat = Mat::new_rows_cols_with_data(image.height as i32, image.width as i32, &image.pixels)
            .map_err(|e| EmotionError::Detection(format!("Failed to create Mat: {e}")))?;

        let mut objects = Vector::<Rect>::new();
        self.classifier
            .detect_multi_scale(
                &*mat,
                &mut objects,
                params.scale_factor,
                params.min_neighbors,
                0,
                Size::new(params.min_size, params.min_size),
                Size::new(0, 0),
            )
            .map_err(|e| EmotionError::Detection(format!("{} detection failed: {e}", self.name)))?;

        Ok(objects
            .iter()
            .map(|r| FaceBox::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
