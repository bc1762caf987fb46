use std::time::Duration;

use crate::assessment::question::QuestionKinds;
use crate::gesture::attention::{ATTENTION_LOSS_WINDOW_MS, LOW_CONFIDENCE_THRESHOLD};
use crate::gesture::debounce::DEFAULT_CONFIRMATION_FRAMES;

pub const TOTAL_LEVELS: u32 = 10;
pub const QUESTIONS_PER_LEVEL: usize = 4;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Process-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub log_level: String,
    pub assessment: AssessmentConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let api_base_url = env_string("API_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let request_timeout =
            Duration::from_millis(env_parse("BACKEND_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT_MS));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let assessment = AssessmentConfig {
            gesture_timeout_ms: env_parse("GESTURE_TIMEOUT_MS"),
            shuffle_seed: env_parse("SHUFFLE_SEED"),
            ..AssessmentConfig::default()
        };

        Self {
            api_base_url,
            request_timeout,
            log_level,
            assessment,
        }
    }
}

/// Progression and detection parameters. `Default` carries the contract
/// values; tests shrink them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentConfig {
    pub total_levels: u32,
    pub questions_per_level: usize,
    pub confirmation_frames: u32,
    pub low_confidence_threshold: f64,
    pub attention_window_ms: u64,
    pub gesture_timeout_ms: Option<u64>,
    pub shuffle_seed: Option<u64>,
    pub enabled_kinds: QuestionKinds,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            total_levels: TOTAL_LEVELS,
            questions_per_level: QUESTIONS_PER_LEVEL,
            confirmation_frames: DEFAULT_CONFIRMATION_FRAMES,
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
            attention_window_ms: ATTENTION_LOSS_WINDOW_MS,
            gesture_timeout_ms: None,
            shuffle_seed: None,
            enabled_kinds: QuestionKinds::all(),
        }
    }
}

impl AssessmentConfig {
    pub fn total_questions(&self) -> usize {
        self.total_levels as usize * self.questions_per_level
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.trim().parse().ok())
}
