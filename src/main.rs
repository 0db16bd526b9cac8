use emotion_monitor::camera::Camera;
use emotion_monitor::config::Config;
use emotion_monitor::emotion::cascade::CascadeDetector;
use emotion_monitor::emotion::{EmotionConfig, EmotionPipeline, RandomJitter};
use emotion_monitor::logging::init_tracing;

fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let log_guard = init_tracing(&config.log_config());
    tracing::info!("Starting emotion-monitor");

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "emotion-monitor stopped");
        drop(log_guard);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> emotion_monitor::Result<()> {
    let emotion_config = match &config.emotion_config_path {
        Some(path) => EmotionConfig::from_file(path)?,
        None => EmotionConfig::default(),
    };

    let detectors = CascadeDetector::load_set(&config.capture.cascade_dir)?;
    let mut pipeline = EmotionPipeline::new(
        emotion_config,
        detectors,
        Box::new(RandomJitter::from_entropy()),
    )?;
    let mut camera = Camera::open(config.capture.camera_id)?;

    let mut frame_count: u64 = 0;
    let mut last_label = None;

    loop {
        if config.capture.max_frames > 0 && frame_count >= config.capture.max_frames {
            break;
        }

        let frame = camera.read_frame()?;
        let sampled = frame_count % config.capture.sample_every == 0;
        frame_count += 1;

        let Some(frame) = frame else {
            tracing::warn!(frame_count, "Empty camera read");
            continue;
        };
        if !sampled {
            continue;
        }

        let Some(result) = pipeline.process_frame(&frame) else {
            continue;
        };

        let label = result.emotion;
        tracing::info!(
            emotion = result.emotion.display_label(),
            confidence = %result.confidence_percent(),
            "Emotion detected"
        );
        pipeline.record_to_history(result);

        if last_label != Some(label) {
            last_label = Some(label);
            let suggestion = pipeline.suggestions();
            match serde_json::to_string(&suggestion) {
                Ok(json) => tracing::info!(suggestion = %json, "Response suggestion updated"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize suggestion"),
            }
        }
    }

    let stats = pipeline.statistics();
    tracing::info!(
        total = stats.total,
        dominant = ?stats.dominant,
        trend = %pipeline.trend(),
        "Session finished"
    );
    pipeline.clear_history();
    Ok(())
}
