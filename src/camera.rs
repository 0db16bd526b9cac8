use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{VideoCapture, VideoCaptureAPIs};

use crate::emotion::frame::{Frame, PixelLayout};
use crate::error::{EmotionError, Result};

pub struct Camera {
    capture: VideoCapture,
}

impl Camera {
    pub fn open(device_id: i32) -> Result<Self> {
        let capture = VideoCapture::new(device_id, VideoCaptureAPIs::CAP_ANY as i32)
            .map_err(|e| EmotionError::Camera(e.to_string()))?;

        if !capture
            .is_opened()
            .map_err(|e| EmotionError::Camera(e.to_string()))?
        {
            return Err(EmotionError::Camera(format!(
                "failed to open camera {device_id}"
            )));
        }

        tracing::info!(device_id, "Camera opened");
        Ok(Self { capture })
    }

    /// 读取下一帧，空帧返回 `Ok(None)`
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut mat = Mat::default();
        let ok = self
            .capture
            .read(&mut mat)
            .map_err(|e| EmotionError::Camera(e.to_string()))?;
        if !ok || mat.empty() {
            return Ok(None);
        }

        let layout = match mat.channels() {
            1 => PixelLayout::Gray,
            3 => PixelLayout::Bgr,
            4 => PixelLayout::Bgra,
            other => {
                tracing::warn!(channels = other, "Unsupported channel count");
                return Ok(None);
            }
        };

        let continuous = if mat.is_continuous() {
            mat
        } else {
            mat.try_clone()
                .map_err(|e| EmotionError::Camera(e.to_string()))?
        };
        let data = continuous
            .data_bytes()
            .map_err(|e| EmotionError::Camera(e.to_string()))?
            .to_vec();

        Ok(Some(Frame::new(
            continuous.cols() as u32,
            continuous.rows() as u32,
            layout,
            data,
        )))
    }
}
