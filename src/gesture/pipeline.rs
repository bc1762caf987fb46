use serde::Serialize;
use tracing::{debug, info, warn};

use super::attention::{AttentionMetrics, AttentionMonitor};
use super::classifier::GestureDefinition;
use super::debounce::{DetectionState, DetectionStatus, StabilityDebouncer};
use super::source::{FrameSource, SensorError, SensorLease, SensorTick};
use crate::config::AssessmentConfig;

/// Everything a gesture question accumulates between ticks. Owned by the
/// question being answered and dropped when it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureState {
    pub detection: DetectionState,
    pub attention: AttentionMetrics,
    pub started_at_ms: u64,
    pub last_tick_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureEnd {
    Confirmed,
    TimedOut,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureOutcome {
    pub gesture: &'static str,
    pub end: GestureEnd,
    pub elapsed_ms: u64,
    pub attention: AttentionMetrics,
}

/// Body of `POST /api/gesture-test/results`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureMetrics {
    pub time_taken: f64,
    pub is_correct: bool,
    pub attention_lost: u32,
    pub sluggishness: u32,
}

impl GestureOutcome {
    pub fn is_correct(&self) -> bool {
        self.end == GestureEnd::Confirmed
    }

    pub fn metrics(&self) -> GestureMetrics {
        GestureMetrics {
            time_taken: (self.elapsed_ms as f64 / 10.0).round() / 100.0,
            is_correct: self.is_correct(),
            attention_lost: self.attention.attention_loss_count,
            sluggishness: self.attention.low_confidence_count,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GesturePipeline {
    target: &'static GestureDefinition,
    debouncer: StabilityDebouncer,
    monitor: AttentionMonitor,
    timeout_ms: Option<u64>,
}

impl GesturePipeline {
    pub fn new(target: &'static GestureDefinition) -> Self {
        Self {
            target,
            debouncer: StabilityDebouncer::default(),
            monitor: AttentionMonitor::default(),
            timeout_ms: None,
        }
    }

    pub fn from_config(target: &'static GestureDefinition, config: &AssessmentConfig) -> Self {
        Self {
            target,
            debouncer: StabilityDebouncer::new(Some(config.confirmation_frames)),
            monitor: AttentionMonitor::new(
                Some(config.low_confidence_threshold),
                Some(config.attention_window_ms),
            ),
            timeout_ms: config.gesture_timeout_ms,
        }
    }

    pub fn target(&self) -> &'static GestureDefinition {
        self.target
    }

    pub fn begin(&self, now_ms: u64) -> GestureState {
        GestureState {
            detection: DetectionState::detecting(),
            attention: AttentionMetrics::started_at(now_ms),
            started_at_ms: now_ms,
            last_tick_ms: now_ms,
        }
    }

    /// Classifier, then debouncer, then attention monitor. Malformed frames
    /// count as "no hand".
    pub fn step(&self, state: GestureState, tick: &SensorTick) -> GestureState {
        if state.detection.status != DetectionStatus::Detecting {
            return state;
        }

        let frame = tick.frame.as_ref().filter(|frame| match frame.validate() {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, now_ms = tick.now_ms, "discarding malformed frame");
                false
            }
        });

        let hit = frame.is_some_and(|f| self.target.matches(f));
        let detection = self.debouncer.step(state.detection, hit);
        let attention = self.monitor.observe(state.attention, frame, tick.now_ms);

        GestureState {
            detection,
            attention,
            started_at_ms: state.started_at_ms,
            last_tick_ms: tick.now_ms.max(state.last_tick_ms),
        }
    }

    pub fn outcome(&self, state: &GestureState, end: GestureEnd) -> GestureOutcome {
        GestureOutcome {
            gesture: self.target.name,
            end,
            elapsed_ms: state.last_tick_ms.saturating_sub(state.started_at_ms),
            attention: state.attention,
        }
    }

    /// Drives the source until the gesture is confirmed, the timeout passes,
    /// or the stream ends. The sensor is released before returning.
    pub fn run<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        started_at_ms: u64,
    ) -> Result<GestureOutcome, SensorError> {
        let mut lease = SensorLease::acquire(source).map_err(|err| {
            warn!(error = %err, gesture = self.target.name, "sensor acquisition failed");
            err
        })?;

        let mut state = self.begin(started_at_ms);

        while let Some(tick) = lease.next_tick() {
            state = self.step(state, &tick);

            if state.detection.is_confirmed() {
                lease.release();
                let outcome = self.outcome(&state, GestureEnd::Confirmed);
                info!(
                    gesture = outcome.gesture,
                    elapsed_ms = outcome.elapsed_ms,
                    attention_lost = outcome.attention.attention_loss_count,
                    low_confidence = outcome.attention.low_confidence_count,
                    "gesture confirmed"
                );
                return Ok(outcome);
            }

            if let Some(timeout) = self.timeout_ms {
                if state.last_tick_ms.saturating_sub(state.started_at_ms) >= timeout {
                    lease.release();
                    info!(gesture = self.target.name, timeout_ms = timeout, "gesture timed out");
                    return Ok(self.outcome(&state, GestureEnd::TimedOut));
                }
            }
        }

        lease.release();
        debug!(gesture = self.target.name, "frame stream ended before confirmation");
        Ok(self.outcome(&state, GestureEnd::Abandoned))
    }
}
