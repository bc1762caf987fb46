//! Session progression
//!
//! # Components
//! - `question.rs`: question variants, responses, type dispatch
//! - `session.rs`: welcome → playing → completed state machine
//! - `results.rs`: append-only result aggregation and summaries
//! - `content.rs`: versioned offline question table

pub mod content;
pub mod question;
pub mod results;
pub mod session;

pub use content::{fallback_questions, shuffle_questions, CONTENT_VERSION};
pub use question::{
    dispatch, AnswerOption, GestureQuestion, MatchQuestion, McqQuestion, MemoryQuestion,
    Processor, Question, QuestionError, QuestionKind, QuestionKinds, Response,
};
pub use results::{LevelSummary, QuestionResult, ResultSummary, ResultsAggregator, TimingMetrics};
pub use session::{ChildProfile, Progress, Recorded, Session, SessionState, TransitionError};
