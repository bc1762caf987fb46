//! Real-time gesture recognition
//!
//! - `landmark`: 21-point hand frames and their validation
//! - `classifier`: per-frame geometric gesture predicates
//! - `debounce`: consecutive-frame confirmation
//! - `attention`: hand visibility and confidence tracking
//! - `source`: injectable frame sources and the sensor lease
//! - `pipeline`: the per-tick step and the detection loop

pub mod attention;
pub mod classifier;
pub mod debounce;
pub mod landmark;
pub mod pipeline;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

pub use attention::{AttentionMetrics, AttentionMonitor};
pub use classifier::{classify, find_gesture, Finger, GestureDefinition, CATALOGUE, TWO_FINGERS};
pub use debounce::{DetectionState, DetectionStatus, StabilityDebouncer};
pub use landmark::{FrameError, HandLandmark, Landmark, LandmarkFrame, HAND_LANDMARK_COUNT};
pub use pipeline::{GestureEnd, GestureMetrics, GestureOutcome, GesturePipeline, GestureState};
pub use source::{FrameSource, ReplaySource, SensorError, SensorLease, SensorTick};
