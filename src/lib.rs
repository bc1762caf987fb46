//! Gesture recognition and level progression for a child-facing adaptive
//! assessment.
//!
//! - [`gesture`]: landmark frames → finger classifier → stability debouncer,
//!   with an attention monitor alongside
//! - [`assessment`]: questions, the session state machine and results
//! - [`backend`]: question fetch and result submission over HTTP
//! - [`runner`]: ties a session to a backend and the gesture pipeline

pub mod assessment;
pub mod backend;
pub mod config;
pub mod error;
pub mod gesture;
pub mod logging;
pub mod runner;

pub use config::{AssessmentConfig, Config};
pub use error::AssessmentError;
pub use runner::{AssessmentRunner, CompletionReport};
