use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIRMATION_FRAMES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStatus {
    Waiting,
    Detecting,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionState {
    pub status: DetectionStatus,
    pub consecutive_hits: u32,
}

impl DetectionState {
    pub const fn waiting() -> Self {
        Self {
            status: DetectionStatus::Waiting,
            consecutive_hits: 0,
        }
    }

    pub const fn detecting() -> Self {
        Self {
            status: DetectionStatus::Detecting,
            consecutive_hits: 0,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == DetectionStatus::Success
    }
}

impl Default for DetectionState {
    fn default() -> Self {
        Self::waiting()
    }
}

/// Confirms a gesture only after an unbroken run of positive frames.
#[derive(Debug, Clone, Copy)]
pub struct StabilityDebouncer {
    threshold: u32,
}

impl StabilityDebouncer {
    pub fn new(threshold: Option<u32>) -> Self {
        Self {
            threshold: threshold.unwrap_or(DEFAULT_CONFIRMATION_FRAMES).max(1),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Consumes one classifier verdict. States other than `Detecting` pass
    /// through untouched, so a confirmed detection never fires twice.
    pub fn step(&self, state: DetectionState, hit: bool) -> DetectionState {
        if state.status != DetectionStatus::Detecting {
            return state;
        }

        if !hit {
            return DetectionState::detecting();
        }

        let consecutive_hits = state.consecutive_hits.saturating_add(1);
        let status = if consecutive_hits >= self.threshold {
            DetectionStatus::Success
        } else {
            DetectionStatus::Detecting
        };

        DetectionState {
            status,
            consecutive_hits,
        }
    }
}

impl Default for StabilityDebouncer {
    fn default() -> Self {
        Self::new(None)
    }
}
