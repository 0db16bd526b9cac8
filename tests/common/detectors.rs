use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use emotion_monitor::emotion::config::DetectionParams;
use emotion_monitor::emotion::{FaceBox, GrayImage, RegionDetector};
use emotion_monitor::Result;

/// 检测器实际收到的输入
#[derive(Debug, Clone)]
pub struct DetectCall {
    pub image: GrayImage,
    pub params: DetectionParams,
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Vec<FaceBox>>,
    calls: Vec<DetectCall>,
}

/// 按帧回放预设检测结果，队列为空时返回空
pub struct ScriptedDetector {
    name: &'static str,
    loaded: bool,
    script: Arc<Mutex<Script>>,
}

#[derive(Clone)]
pub struct ScriptHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptHandle {
    pub fn push(&self, regions: Vec<FaceBox>) {
        self.script.lock().expect("script lock").responses.push_back(regions);
    }

    pub fn pending(&self) -> usize {
        self.script.lock().expect("script lock").responses.len()
    }

    pub fn calls(&self) -> Vec<DetectCall> {
        self.script.lock().expect("script lock").calls.clone()
    }

    pub fn last_call(&self) -> Option<DetectCall> {
        self.script.lock().expect("script lock").calls.last().cloned()
    }
}

impl ScriptedDetector {
    pub fn new(name: &'static str) -> (Box<dyn RegionDetector>, ScriptHandle) {
        let script = Arc::new(Mutex::new(Script::default()));
        let detector = ScriptedDetector {
            name,
            loaded: true,
            script: script.clone(),
        };
        (Box::new(detector), ScriptHandle { script })
    }

    pub fn unloaded(name: &'static str) -> Box<dyn RegionDetector> {
        Box::new(ScriptedDetector {
            name,
            loaded: false,
            script: Arc::new(Mutex::new(Script::default())),
        })
    }
}

impl RegionDetector for ScriptedDetector {
    fn name(&self) -> &str {
        self.name
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn detect(&mut self, image: &GrayImage, params: &DetectionParams) -> Result<Vec<FaceBox>> {
        let mut script = self.script.lock().expect("script lock");
        script.calls.push(DetectCall {
            image: image.clone(),
            params: *params,
        });
        Ok(script.responses.pop_front().unwrap_or_default())
    }
}
