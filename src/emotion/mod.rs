pub mod config;
pub mod features;
pub mod frame;
pub mod history;
pub mod monitoring;
pub mod pipeline;
pub mod scorer;
pub mod stabilizer;
pub mod suggestions;
pub mod types;

#[cfg(feature = "opencv")]
pub mod cascade;

pub use config::EmotionConfig;
pub use features::{FaceFeatures, FeatureExtractor, FeatureSignals, RegionDetector};
pub use frame::{Frame, GrayImage, PixelLayout};
pub use history::EmotionHistory;
pub use pipeline::{DetectorSet, EmotionPipeline};
pub use scorer::{EmotionScorer, Jitter, NoJitter, RandomJitter};
pub use stabilizer::TemporalStabilizer;
pub use types::{Emotion, EmotionDistribution, EmotionResult, FaceBox, Suggestion, Trend};
