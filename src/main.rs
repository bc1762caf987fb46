use std::process::ExitCode;

use quest_assessment::backend::{AssessmentBackend, HttpBackend};
use quest_assessment::config::Config;
use quest_assessment::gesture::{find_gesture, GesturePipeline, ReplaySource};
use quest_assessment::logging::init_tracing;

const USAGE: &str = "usage: quest-assessment <frames.json> [gesture]";

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };
    let gesture_key = args.next().unwrap_or_else(|| "two_fingers".to_string());

    let Some(target) = find_gesture(&gesture_key) else {
        tracing::error!(gesture = %gesture_key, "unknown gesture");
        return ExitCode::from(2);
    };

    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(path = %path, error = %err, "failed to read frame recording");
            return ExitCode::FAILURE;
        }
    };
    let mut source = match ReplaySource::from_json(&raw) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!(path = %path, error = %err, "invalid frame recording");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        gesture = target.name,
        ticks = source.remaining(),
        "replaying frame recording"
    );

    let pipeline = GesturePipeline::from_config(target, &config.assessment);
    let outcome = match pipeline.run(&mut source, 0) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, "gesture test blocked");
            return ExitCode::FAILURE;
        }
    };

    let metrics = outcome.metrics();
    match serde_json::to_string_pretty(&metrics) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "failed to encode metrics"),
    }

    let backend = HttpBackend::new(&config);
    if let Err(err) = backend.submit_gesture_metrics(&metrics).await {
        tracing::warn!(
            base_url = backend.base_url(),
            error = %err,
            "failed to submit gesture metrics"
        );
    }

    if outcome.is_correct() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
