use thiserror::Error;

use crate::assessment::question::QuestionError;
use crate::assessment::session::TransitionError;
use crate::backend::BackendError;
use crate::gesture::source::SensorError;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    /// Blocks the gesture question until the camera is fixed externally.
    #[error(transparent)]
    Sensor(#[from] SensorError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl AssessmentError {
    /// Errors the child should see. Backend problems degrade silently to
    /// local paths; malformed frames never leave the pipeline.
    pub fn is_blocking(&self) -> bool {
        matches!(self, AssessmentError::Sensor(_))
    }
}
