use super::classifier::Finger;
use super::landmark::{HandLandmark, Landmark, LandmarkFrame, HAND_LANDMARK_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FingerPose {
    Extended,
    Folded,
}

/// Builds synthetic 21-point hands column by column.
#[derive(Debug, Clone)]
pub(crate) struct HandBuilder {
    landmarks: Vec<Landmark>,
    confidence: f64,
}

fn column(finger: Finger) -> f64 {
    match finger {
        Finger::Thumb => 0.3,
        Finger::Index => 0.4,
        Finger::Middle => 0.5,
        Finger::Ring => 0.6,
        Finger::Pinky => 0.7,
    }
}

fn base_index(finger: Finger) -> usize {
    match finger {
        Finger::Thumb => HandLandmark::ThumbCmc.index(),
        Finger::Index => HandLandmark::IndexMcp.index(),
        Finger::Middle => HandLandmark::MiddleMcp.index(),
        Finger::Ring => HandLandmark::RingMcp.index(),
        Finger::Pinky => HandLandmark::PinkyMcp.index(),
    }
}

impl HandBuilder {
    pub(crate) fn fist() -> Self {
        let mut builder = Self {
            landmarks: vec![Landmark::new(0.5, 0.9); HAND_LANDMARK_COUNT],
            confidence: 0.95,
        };
        for finger in Finger::ALL {
            builder = builder.finger(finger, FingerPose::Folded);
        }
        builder
    }

    pub(crate) fn two_fingers() -> Self {
        Self::fist()
            .finger(Finger::Index, FingerPose::Extended)
            .finger(Finger::Middle, FingerPose::Extended)
    }

    pub(crate) fn open_palm() -> Self {
        Self::fist()
            .finger(Finger::Index, FingerPose::Extended)
            .finger(Finger::Middle, FingerPose::Extended)
            .finger(Finger::Ring, FingerPose::Extended)
            .finger(Finger::Pinky, FingerPose::Extended)
    }

    pub(crate) fn finger(mut self, finger: Finger, pose: FingerPose) -> Self {
        // four joints per finger, base first
        let ys = match (finger, pose) {
            (Finger::Thumb, FingerPose::Extended) => [0.78, 0.65, 0.55, 0.45],
            (Finger::Thumb, FingerPose::Folded) => [0.78, 0.72, 0.70, 0.74],
            (_, FingerPose::Extended) => [0.70, 0.55, 0.47, 0.40],
            (_, FingerPose::Folded) => [0.70, 0.62, 0.66, 0.68],
        };
        let x = column(finger);
        let start = base_index(finger);
        for (offset, y) in ys.into_iter().enumerate() {
            self.landmarks[start + offset] = Landmark::new(x, y);
        }
        self
    }

    /// Touches the thumb tip to the index tip.
    pub(crate) fn pinch(mut self) -> Self {
        let index_tip = self.landmarks[HandLandmark::IndexTip.index()];
        self.landmarks[HandLandmark::ThumbTip.index()] =
            Landmark::new(index_tip.x + 0.01, index_tip.y + 0.01);
        self
    }

    pub(crate) fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub(crate) fn build(&self, captured_at_ms: u64) -> LandmarkFrame {
        LandmarkFrame::new(self.landmarks.clone(), self.confidence, captured_at_ms)
    }
}
