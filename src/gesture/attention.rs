use serde::{Deserialize, Serialize};

use super::landmark::LandmarkFrame;

pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const ATTENTION_LOSS_WINDOW_MS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionMetrics {
    pub last_seen_at_ms: u64,
    pub attention_loss_count: u32,
    pub low_confidence_count: u32,
}

impl AttentionMetrics {
    pub fn started_at(now_ms: u64) -> Self {
        Self {
            last_seen_at_ms: now_ms,
            ..Self::default()
        }
    }
}

/// Tracks hand visibility and detector confidence while a gesture is awaited.
#[derive(Debug, Clone, Copy)]
pub struct AttentionMonitor {
    low_confidence_threshold: f64,
    loss_window_ms: u64,
}

impl AttentionMonitor {
    pub fn new(low_confidence_threshold: Option<f64>, loss_window_ms: Option<u64>) -> Self {
        Self {
            low_confidence_threshold: low_confidence_threshold.unwrap_or(LOW_CONFIDENCE_THRESHOLD),
            loss_window_ms: loss_window_ms.unwrap_or(ATTENTION_LOSS_WINDOW_MS),
        }
    }

    /// One tick. A sustained absence accrues at most one loss per window
    /// because `last_seen_at_ms` is pushed forward whenever a loss is counted.
    pub fn observe(
        &self,
        metrics: AttentionMetrics,
        frame: Option<&LandmarkFrame>,
        now_ms: u64,
    ) -> AttentionMetrics {
        let mut next = metrics;

        match frame {
            Some(frame) => {
                next.last_seen_at_ms = now_ms;
                if frame.confidence < self.low_confidence_threshold {
                    next.low_confidence_count = next.low_confidence_count.saturating_add(1);
                }
            }
            None => {
                if now_ms.saturating_sub(metrics.last_seen_at_ms) >= self.loss_window_ms {
                    next.attention_loss_count = next.attention_loss_count.saturating_add(1);
                    next.last_seen_at_ms = now_ms;
                }
            }
        }

        next
    }
}

impl Default for AttentionMonitor {
    fn default() -> Self {
        Self::new(None, None)
    }
}
