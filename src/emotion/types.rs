use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprise,
    Fear,
    Disgust,
}

impl Emotion {
    /// 固定迭代顺序，同分时排在前面的类别胜出
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Neutral,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Disgust,
    ];

    pub fn index(self) -> usize {
        match self {
            Emotion::Happy => 0,
            Emotion::Sad => 1,
            Emotion::Angry => 2,
            Emotion::Neutral => 3,
            Emotion::Surprise => 4,
            Emotion::Fear => 5,
            Emotion::Disgust => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
            Emotion::Surprise => "surprise",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            Emotion::Happy => "😊 Happy",
            Emotion::Sad => "😢 Sad",
            Emotion::Angry => "😠 Angry",
            Emotion::Neutral => "😐 Neutral",
            Emotion::Surprise => "😲 Surprised",
            Emotion::Fear => "😨 Afraid",
            Emotion::Disgust => "🤢 Disgusted",
        }
    }

    /// 趋势分析使用的积极度权重
    pub fn positivity(self) -> f64 {
        match self {
            Emotion::Happy => 1.0,
            Emotion::Surprise => 0.5,
            Emotion::Neutral => 0.0,
            Emotion::Fear => -0.5,
            Emotion::Sad => -0.7,
            Emotion::Disgust => -0.8,
            Emotion::Angry => -1.0,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown emotion: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }
}

/// 七个类别的得分，始终完整
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub neutral: f64,
    pub surprise: f64,
    pub fear: f64,
    pub disgust: f64,
}

impl EmotionDistribution {
    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Neutral => self.neutral,
            Emotion::Surprise => self.surprise,
            Emotion::Fear => self.fear,
            Emotion::Disgust => self.disgust,
        }
    }

    pub fn set(&mut self, emotion: Emotion, value: f64) {
        let slot = match emotion {
            Emotion::Happy => &mut self.happy,
            Emotion::Sad => &mut self.sad,
            Emotion::Angry => &mut self.angry,
            Emotion::Neutral => &mut self.neutral,
            Emotion::Surprise => &mut self.surprise,
            Emotion::Fear => &mut self.fear,
            Emotion::Disgust => &mut self.disgust,
        };
        *slot = value;
    }

    /// 仅在当前值更低时提升
    pub fn raise(&mut self, emotion: Emotion, value: f64) {
        if value > self.get(emotion) {
            self.set(emotion, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(move |e| (e, self.get(e)))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }

    /// 按总和归一化并保留两位小数，舍入后总和只近似为 1（见 `DISTRIBUTION_SUM_TOLERANCE`）
    pub fn normalized(&self) -> EmotionDistribution {
        let total = self.sum();
        if total <= f64::EPSILON || !total.is_finite() {
            return EmotionDistribution {
                neutral: 1.0,
                ..EmotionDistribution::default()
            };
        }

        let mut out = EmotionDistribution::default();
        for (emotion, value) in self.iter() {
            out.set(emotion, round2(value / total));
        }
        out
    }

    /// 同分取 `Emotion::ALL` 中靠前的类别
    pub fn dominant(&self) -> (Emotion, f64) {
        let mut best = (Emotion::ALL[0], self.get(Emotion::ALL[0]));
        for (emotion, value) in self.iter().skip(1) {
            if value > best.1 {
                best = (emotion, value);
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionResult {
    pub emotion: Emotion,
    pub confidence: f64,
    pub distribution: EmotionDistribution,
    pub face_box: Option<FaceBox>,
    pub captured_at: DateTime<Utc>,
}

impl EmotionResult {
    pub fn new(
        emotion: Emotion,
        confidence: f64,
        distribution: EmotionDistribution,
        face_box: Option<FaceBox>,
    ) -> Self {
        Self {
            emotion,
            confidence,
            distribution,
            face_box,
            captured_at: Utc::now(),
        }
    }

    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    /// 柱状图数据，按得分降序
    pub fn bar_data(&self) -> Vec<EmotionBar> {
        let mut bars: Vec<EmotionBar> = self
            .distribution
            .iter()
            .map(|(emotion, score)| EmotionBar {
                emotion,
                label: emotion.display_label().to_string(),
                score,
                percentage: format!("{:.1}%", score * 100.0),
            })
            .collect();
        bars.sort_by(|a, b| b.score.total_cmp(&a.score));
        bars
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionBar {
    pub emotion: Emotion,
    pub label: String,
    pub score: f64,
    pub percentage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub dominant_emotion: Option<Emotion>,
    pub trend: Trend,
    pub tone: String,
    pub approach: Vec<String>,
    pub avoid: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionShare {
    pub emotion: Emotion,
    pub count: usize,
    /// 百分比，保留一位小数
    pub percentage: f64,
    /// 平均置信度，保留两位小数
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatistics {
    pub total: usize,
    pub dominant: Option<Emotion>,
    pub distribution: Vec<EmotionShare>,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
