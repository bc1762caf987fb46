use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::question::{dispatch, Processor, Question, QuestionError, QuestionKind, Response};
use super::results::{QuestionResult, ResultsAggregator, TimingMetrics};
use crate::config::AssessmentConfig;
use crate::error::AssessmentError;
use crate::gesture::pipeline::GestureOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Welcome,
    Playing,
    Completed,
}

impl SessionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionState::Welcome => "welcome",
            SessionState::Playing => "playing",
            SessionState::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub name: String,
    pub age: u8,
}

#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: SessionState,
    pub to: SessionState,
    pub at: DateTime<Utc>,
}

/// Where the session moved after a result was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NextQuestion { level: u32, q_index: usize },
    /// The caller must load this level's questions before presenting.
    NextLevel { level: u32 },
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub result: QuestionResult,
    pub progress: Progress,
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
    #[error("session is {0:?}, not playing")]
    NotPlaying(SessionState),
    #[error("no question loaded for level {level} index {q_index}")]
    NoQuestion { level: u32, q_index: usize },
    #[error("current question is a {0}, not a gesture question")]
    NotGesture(&'static str),
}

/// One child's run through every level. The single mutable root of the
/// assessment.
#[derive(Debug)]
pub struct Session {
    id: String,
    profile: Option<ChildProfile>,
    config: AssessmentConfig,
    state: SessionState,
    level: u32,
    q_index: usize,
    questions: Vec<Question>,
    loaded_level: Option<u32>,
    presented_at_ms: Option<u64>,
    results: ResultsAggregator,
    history: Vec<StateTransition>,
}

impl Session {
    pub fn new(config: AssessmentConfig) -> Self {
        Self::with_id(format!("session_{}", Uuid::new_v4()), config)
    }

    pub fn with_id(id: impl Into<String>, config: AssessmentConfig) -> Self {
        let capacity = config.total_questions();
        Self {
            id: id.into(),
            profile: None,
            config,
            state: SessionState::Welcome,
            level: 1,
            q_index: 0,
            questions: Vec::new(),
            loaded_level: None,
            presented_at_ms: None,
            results: ResultsAggregator::with_capacity(capacity),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile(&self) -> Option<&ChildProfile> {
        self.profile.as_ref()
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn q_index(&self) -> usize {
        self.q_index
    }

    pub fn results(&self) -> &ResultsAggregator {
        &self.results
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Level whose questions are currently loaded, if any.
    pub fn loaded_level(&self) -> Option<u32> {
        self.loaded_level
    }

    fn transition_to(&mut self, target: SessionState) -> Result<(), TransitionError> {
        let allowed = matches!(
            (self.state, target),
            (SessionState::Welcome, SessionState::Playing)
                | (SessionState::Playing, SessionState::Completed)
        );
        if !allowed {
            return Err(TransitionError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }

        self.history.push(StateTransition {
            from: self.state,
            to: target,
            at: Utc::now(),
        });
        debug!(session_id = %self.id, from = self.state.as_str(), to = target.as_str(), "session transition");
        self.state = target;
        Ok(())
    }

    /// Welcome → Playing. Level 1 questions still have to be loaded.
    pub fn start(&mut self, profile: ChildProfile) -> Result<(), TransitionError> {
        self.transition_to(SessionState::Playing)?;
        info!(session_id = %self.id, child = %profile.name, age = profile.age, "session started");
        self.profile = Some(profile);
        Ok(())
    }

    /// Installs the question set for `level`. Sets for any other level are
    /// stale and ignored; returns whether the set was taken.
    pub fn load_questions(&mut self, level: u32, questions: Vec<Question>) -> bool {
        if self.state != SessionState::Playing || level != self.level {
            debug!(
                session_id = %self.id,
                level,
                current_level = self.level,
                "ignoring stale question set"
            );
            return false;
        }
        self.questions = questions;
        self.loaded_level = Some(level);
        self.presented_at_ms = None;
        true
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.state != SessionState::Playing || self.loaded_level != Some(self.level) {
            return None;
        }
        self.questions.get(self.q_index)
    }

    fn require_question(&self) -> Result<&Question, TransitionError> {
        if self.state != SessionState::Playing {
            return Err(TransitionError::NotPlaying(self.state));
        }
        self.current_question().ok_or(TransitionError::NoQuestion {
            level: self.level,
            q_index: self.q_index,
        })
    }

    /// Marks the current question as shown and starts its timer. Returns the
    /// question's processor; unknown types come back as an error.
    pub fn present(&mut self, now_ms: u64) -> Result<Processor<'_>, AssessmentError> {
        self.require_question()?;
        if self.presented_at_ms.is_none() {
            self.presented_at_ms = Some(now_ms);
        }
        let question = self.require_question()?;
        Ok(dispatch(question, &self.config.enabled_kinds)?)
    }

    fn elapsed_since_presented(&self, now_ms: u64) -> u64 {
        self.presented_at_ms
            .map(|at| now_ms.saturating_sub(at))
            .unwrap_or(0)
    }

    /// Scores a response to the current question and records it.
    pub fn submit_answer(
        &mut self,
        response: Response,
        now_ms: u64,
    ) -> Result<Recorded, AssessmentError> {
        let question = self.require_question()?;
        let processor = dispatch(question, &self.config.enabled_kinds)?;
        let kind = processor.kind();
        let correct = processor.evaluate(&response)?;
        let timing = TimingMetrics::elapsed(self.elapsed_since_presented(now_ms));

        Ok(self.record(kind, response, timing, correct))
    }

    /// Records the detection pipeline's verdict for the current gesture
    /// question.
    pub fn record_gesture(&mut self, outcome: &GestureOutcome) -> Result<Recorded, AssessmentError> {
        let question = self.require_question()?;
        let processor = dispatch(question, &self.config.enabled_kinds)?;
        let kind = processor.kind();
        let definition = match processor {
            Processor::Gesture { definition, .. } => definition,
            other => return Err(TransitionError::NotGesture(other.kind().as_str()).into()),
        };
        if definition.name != outcome.gesture {
            return Err(QuestionError::UnknownGesture(outcome.gesture.to_string()).into());
        }

        let timing = TimingMetrics {
            time_taken: outcome.elapsed_ms,
            attention_lost: Some(outcome.attention.attention_loss_count),
            sluggishness: Some(outcome.attention.low_confidence_count),
        };
        let response = Response::Gesture {
            gesture: definition.symbol.to_string(),
        };

        Ok(self.record(kind, response, timing, outcome.is_correct()))
    }

    fn record(
        &mut self,
        kind: QuestionKind,
        response: Response,
        timing: TimingMetrics,
        correct: bool,
    ) -> Recorded {
        let result = QuestionResult {
            level: self.level,
            q_index: self.q_index,
            kind,
            response,
            timing,
            correct,
            timestamp: Utc::now(),
        };
        self.results.record(result.clone());
        self.presented_at_ms = None;

        let progress = self.advance();
        Recorded { result, progress }
    }

    fn advance(&mut self) -> Progress {
        if self.q_index + 1 < self.config.questions_per_level {
            self.q_index += 1;
            return Progress::NextQuestion {
                level: self.level,
                q_index: self.q_index,
            };
        }

        if self.level < self.config.total_levels {
            self.level += 1;
            self.q_index = 0;
            self.questions.clear();
            self.loaded_level = None;
            info!(session_id = %self.id, level = self.level, "advancing to next level");
            return Progress::NextLevel { level: self.level };
        }

        // Playing → Completed is always permitted from here.
        let _ = self.transition_to(SessionState::Completed);
        info!(
            session_id = %self.id,
            answered = self.results.len(),
            "session completed"
        );
        Progress::Completed
    }
}
