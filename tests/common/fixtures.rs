use emotion_monitor::emotion::{
    DetectorSet, EmotionConfig, EmotionDistribution, EmotionPipeline, EmotionResult, FaceBox,
    Frame, NoJitter, PixelLayout,
};
use emotion_monitor::emotion::Emotion;

use super::detectors::{ScriptHandle, ScriptedDetector};

pub const FACE: FaceBox = FaceBox {
    x: 40,
    y: 30,
    width: 100,
    height: 100,
};

pub struct Harness {
    pub pipeline: EmotionPipeline,
    pub face: ScriptHandle,
    pub smile: ScriptHandle,
    pub eye: ScriptHandle,
}

/// 评分器能区分的几种信号组合，以检测器输出表示
#[derive(Debug, Clone, Copy)]
pub enum Cue {
    /// 笑容 → happy
    Smile,
    /// 两只正常大小的眼睛 → neutral
    CalmEyes,
    /// 两只睁大的眼睛 → surprise
    WideEyes,
    /// 不足两只眼睛且无笑容 → angry
    SquintNoSmile,
    /// 画面中没有人脸
    NoFace,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EmotionConfig::default())
    }

    pub fn with_config(config: EmotionConfig) -> Self {
        let (face_detector, face) = ScriptedDetector::new("face");
        let (smile_detector, smile) = ScriptedDetector::new("smile");
        let (eye_detector, eye) = ScriptedDetector::new("eye");
        let pipeline = EmotionPipeline::new(
            config,
            DetectorSet {
                face: face_detector,
                smile: smile_detector,
                eye: eye_detector,
            },
            Box::new(NoJitter),
        )
        .expect("pipeline");
        Self {
            pipeline,
            face,
            smile,
            eye,
        }
    }

    pub fn script(&self, cue: Cue) {
        if let Cue::NoFace = cue {
            self.face.push(vec![]);
            return;
        }
        self.face.push(vec![FaceBox::new(0, 0, 30, 30), FACE]);
        match cue {
            Cue::Smile => {
                self.smile.push(vec![FaceBox::new(30, 60, 40, 20)]);
                self.eye.push(vec![FaceBox::new(20, 30, 10, 10), FaceBox::new(60, 30, 10, 10)]);
            }
            Cue::CalmEyes => {
                self.smile.push(vec![]);
                self.eye.push(vec![FaceBox::new(20, 30, 10, 10), FaceBox::new(60, 30, 10, 10)]);
            }
            Cue::WideEyes => {
                self.smile.push(vec![]);
                self.eye.push(vec![FaceBox::new(15, 25, 20, 20), FaceBox::new(60, 25, 20, 20)]);
            }
            Cue::SquintNoSmile => {
                self.smile.push(vec![]);
                self.eye.push(vec![FaceBox::new(20, 30, 10, 10)]);
            }
            Cue::NoFace => unreachable!(),
        }
    }

    pub fn feed(&mut self, cue: Cue) -> Option<EmotionResult> {
        self.script(cue);
        self.pipeline.process_frame(&frame())
    }
}

pub fn frame() -> Frame {
    Frame::new(320, 240, PixelLayout::Bgr, vec![96; 320 * 240 * 3])
}

/// `FACE` 区域内像素为 200，其余为 20
pub fn marked_frame() -> Frame {
    let (width, height) = (320_usize, 240_usize);
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let inside = x >= FACE.x
                && x < FACE.x + FACE.width
                && y >= FACE.y
                && y < FACE.y + FACE.height;
            let v = if inside { 200 } else { 20 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    Frame::new(width as u32, height as u32, PixelLayout::Bgr, data)
}

pub fn result(emotion: Emotion) -> EmotionResult {
    EmotionResult::new(emotion, 0.5, EmotionDistribution::default(), None)
}
