use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::landmark::LandmarkFrame;

/// What the sensor produced on one tick. `frame` is `None` when no hand was
/// visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorTick {
    pub now_ms: u64,
    #[serde(default)]
    pub frame: Option<LandmarkFrame>,
}

impl SensorTick {
    pub fn hand(frame: LandmarkFrame, now_ms: u64) -> Self {
        Self {
            now_ms,
            frame: Some(frame),
        }
    }

    pub fn empty(now_ms: u64) -> Self {
        Self { now_ms, frame: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("sensor unavailable: {0}")]
    Unavailable(String),
}

/// Externally driven landmark stream. `open` acquires the camera, `close`
/// releases it; `next_tick` yields `None` once the stream has ended.
pub trait FrameSource {
    fn open(&mut self) -> Result<(), SensorError>;
    fn next_tick(&mut self) -> Option<SensorTick>;
    fn close(&mut self);
}

/// Holds an opened source and closes it exactly once, on `release` or drop.
pub struct SensorLease<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    released: bool,
}

impl<'a, S: FrameSource + ?Sized> SensorLease<'a, S> {
    pub fn acquire(source: &'a mut S) -> Result<Self, SensorError> {
        source.open()?;
        Ok(Self {
            source,
            released: false,
        })
    }

    pub fn next_tick(&mut self) -> Option<SensorTick> {
        if self.released {
            return None;
        }
        self.source.next_tick()
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.source.close();
        debug!("sensor released");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<S: FrameSource + ?Sized> Drop for SensorLease<'_, S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Plays back a recorded tick sequence.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    ticks: VecDeque<SensorTick>,
    denied: bool,
    open: bool,
    open_calls: u32,
    close_calls: u32,
}

impl ReplaySource {
    pub fn new(ticks: impl IntoIterator<Item = SensorTick>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A source whose camera permission is refused.
    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let ticks: Vec<SensorTick> = serde_json::from_str(raw)?;
        Ok(Self::new(ticks))
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open_calls(&self) -> u32 {
        self.open_calls
    }

    pub fn close_calls(&self) -> u32 {
        self.close_calls
    }
}

impl FrameSource for ReplaySource {
    fn open(&mut self) -> Result<(), SensorError> {
        if self.denied {
            return Err(SensorError::PermissionDenied);
        }
        self.open = true;
        self.open_calls += 1;
        Ok(())
    }

    fn next_tick(&mut self) -> Option<SensorTick> {
        if !self.open {
            return None;
        }
        self.ticks.pop_front()
    }

    fn close(&mut self) {
        self.open = false;
        self.close_calls += 1;
    }
}
