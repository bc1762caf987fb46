use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HAND_LANDMARK_COUNT: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[inline]
pub fn planar_distance(p1: &Landmark, p2: &Landmark) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Anatomical positions of the 21-point hand model, in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("expected {HAND_LANDMARK_COUNT} landmarks, got {0}")]
    LandmarkCount(usize),
    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
    #[error("confidence {0} outside [0, 1]")]
    Confidence(f64),
}

fn default_confidence() -> f64 {
    1.0
}

/// One sampled hand: landmarks in [`HandLandmark`] order, the handedness
/// score reported by the detector, and the capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub landmarks: Vec<Landmark>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub captured_at_ms: u64,
}

impl LandmarkFrame {
    pub fn new(landmarks: Vec<Landmark>, confidence: f64, captured_at_ms: u64) -> Self {
        Self {
            landmarks,
            confidence,
            captured_at_ms,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == HAND_LANDMARK_COUNT
    }

    pub fn point(&self, landmark: HandLandmark) -> Option<&Landmark> {
        if !self.is_complete() {
            return None;
        }
        self.landmarks.get(landmark.index())
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        if !self.is_complete() {
            return Err(FrameError::LandmarkCount(self.landmarks.len()));
        }
        if let Some(idx) = self.landmarks.iter().position(|p| !p.is_finite()) {
            return Err(FrameError::NonFinite(idx));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(FrameError::Confidence(self.confidence));
        }
        Ok(())
    }
}
