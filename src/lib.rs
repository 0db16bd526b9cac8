pub mod config;
pub mod constants;
pub mod emotion;
pub mod error;
pub mod logging;

#[cfg(feature = "opencv")]
pub mod camera;

pub use error::{EmotionError, Result};
