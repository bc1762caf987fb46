//! Drives a [`Session`] against an [`AssessmentBackend`].
//!
//! Question sets are fetched per level with a local fallback. Results and the
//! final analysis are submitted in spawned tasks that never hold up
//! progression; `flush_submissions` collects them.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::assessment::content::{fallback_questions, shuffle_questions};
use crate::assessment::question::{dispatch, Processor, Question, Response};
use crate::assessment::results::{QuestionResult, ResultSummary};
use crate::assessment::session::{ChildProfile, Progress, Recorded, Session, TransitionError};
use crate::backend::{AnalysisSummary, AssessmentBackend, SessionContext};
use crate::config::AssessmentConfig;
use crate::error::AssessmentError;
use crate::gesture::pipeline::{GestureOutcome, GesturePipeline};
use crate::gesture::source::FrameSource;

/// What the completion screen renders.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub session_id: String,
    pub results: Vec<QuestionResult>,
    pub summary: ResultSummary,
    /// `None` when the backend could not produce an analysis.
    pub analysis: Option<AnalysisSummary>,
}

pub struct AssessmentRunner {
    session: Session,
    backend: Arc<dyn AssessmentBackend>,
    child_age: u8,
    pending: Vec<JoinHandle<()>>,
    analysis_task: Option<JoinHandle<Option<AnalysisSummary>>>,
    analysis: Option<AnalysisSummary>,
}

impl AssessmentRunner {
    pub fn new(config: AssessmentConfig, backend: Arc<dyn AssessmentBackend>) -> Self {
        Self::with_session(Session::new(config), backend)
    }

    pub fn with_session(session: Session, backend: Arc<dyn AssessmentBackend>) -> Self {
        Self {
            session,
            backend,
            child_age: 0,
            pending: Vec::new(),
            analysis_task: None,
            analysis: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Starts the session and loads level 1.
    pub async fn start(&mut self, profile: ChildProfile) -> Result<(), AssessmentError> {
        self.child_age = profile.age;
        self.session.start(profile)?;
        let level = self.session.level();
        self.load_level(level).await;
        Ok(())
    }

    async fn load_level(&mut self, level: u32) {
        let context = SessionContext {
            session_id: self.session.id().to_string(),
            child_age: self.child_age,
        };
        let config = self.session.config().clone();
        let per_level = config.questions_per_level;

        let mut questions = match self.backend.fetch_questions(level, &context).await {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                warn!(level, "backend returned an empty question set, using local content");
                fallback_questions(level, &config.enabled_kinds, per_level)
            }
            Err(err) => {
                warn!(level, error = %err, "failed to fetch questions, using local content");
                fallback_questions(level, &config.enabled_kinds, per_level)
            }
        };

        let local = fallback_questions(level, &config.enabled_kinds, per_level);

        if questions.len() < per_level {
            let missing = per_level - questions.len();
            debug!(level, missing, "padding question set with local content");
            let have = questions.len();
            questions.extend(local.iter().skip(have).cloned());
        }
        questions.truncate(per_level);

        // every loaded question must dispatch
        for (index, question) in questions.iter_mut().enumerate() {
            let rejected = dispatch(question, &config.enabled_kinds).err();
            if let Some(err) = rejected {
                if let Some(replacement) = local.get(index) {
                    warn!(
                        level,
                        index,
                        error = %err,
                        "replacing unanswerable question with local content"
                    );
                    *question = replacement.clone();
                }
            }
        }

        if let Some(seed) = config.shuffle_seed {
            shuffle_questions(&mut questions, seed, level);
        }

        self.session.load_questions(level, questions);
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    /// Shows the current question. Levels loaded here only hold questions
    /// that dispatch.
    pub fn present(&mut self, now_ms: u64) -> Result<Processor<'_>, AssessmentError> {
        self.session.present(now_ms)
    }

    /// Scores an mcq, memory or match answer. Gesture questions go through
    /// [`AssessmentRunner::run_gesture`].
    pub async fn answer(
        &mut self,
        response: Response,
        now_ms: u64,
    ) -> Result<Recorded, AssessmentError> {
        let recorded = self.session.submit_answer(response, now_ms)?;
        self.after_record(&recorded).await;
        Ok(recorded)
    }

    /// Runs the detection pipeline for the current gesture question and records
    /// its verdict. A refused sensor leaves the session untouched.
    pub async fn run_gesture<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        now_ms: u64,
    ) -> Result<Recorded, AssessmentError> {
        let definition = match self.session.present(now_ms)? {
            Processor::Gesture { definition, .. } => definition,
            other => return Err(TransitionError::NotGesture(other.kind().as_str()).into()),
        };

        let pipeline = GesturePipeline::from_config(definition, self.session.config());
        let outcome = pipeline.run(source, now_ms)?;
        self.spawn_gesture_metrics(&outcome);

        let recorded = self.session.record_gesture(&outcome)?;
        self.after_record(&recorded).await;
        Ok(recorded)
    }

    async fn after_record(&mut self, recorded: &Recorded) {
        self.spawn_submission(recorded.result.clone());

        match recorded.progress {
            Progress::NextQuestion { .. } => {}
            Progress::NextLevel { level } => self.load_level(level).await,
            Progress::Completed => self.spawn_analysis(),
        }
    }

    fn spawn_submission(&mut self, result: QuestionResult) {
        let backend = Arc::clone(&self.backend);
        let session_id = self.session.id().to_string();

        self.pending.retain(|handle| !handle.is_finished());
        self.pending.push(tokio::spawn(async move {
            if let Err(err) = backend.submit_result(&session_id, &result).await {
                warn!(
                    session_id = %session_id,
                    level = result.level,
                    q_index = result.q_index,
                    error = %err,
                    "failed to submit result"
                );
            }
        }));
    }

    fn spawn_gesture_metrics(&mut self, outcome: &GestureOutcome) {
        let backend = Arc::clone(&self.backend);
        let metrics = outcome.metrics();

        self.pending.push(tokio::spawn(async move {
            if let Err(err) = backend.submit_gesture_metrics(&metrics).await {
                warn!(error = %err, "failed to submit gesture metrics");
            }
        }));
    }

    fn spawn_analysis(&mut self) {
        let backend = Arc::clone(&self.backend);
        let session_id = self.session.id().to_string();
        let results = self.session.results().results().to_vec();

        self.analysis_task = Some(tokio::spawn(async move {
            match backend.submit_analysis(&session_id, &results).await {
                Ok(analysis) => {
                    info!(session_id = %session_id, "analysis received");
                    Some(analysis)
                }
                Err(err) => {
                    warn!(
                        session_id = %session_id,
                        error = %err,
                        "analysis submission failed, completing with local summary"
                    );
                    None
                }
            }
        }));
    }

    /// Waits for every in-flight submission, including the analysis request.
    pub async fn flush_submissions(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(err) = handle.await {
                warn!(error = %err, "submission task failed");
            }
        }

        if let Some(task) = self.analysis_task.take() {
            match task.await {
                Ok(analysis) => self.analysis = analysis,
                Err(err) => warn!(error = %err, "analysis task failed"),
            }
        }
    }

    /// `None` until the session has completed. The backend analysis shows up
    /// once [`AssessmentRunner::flush_submissions`] has collected it.
    pub fn completion(&self) -> Option<CompletionReport> {
        if !self.session.is_completed() {
            return None;
        }
        let results = self.session.results();
        Some(CompletionReport {
            session_id: self.session.id().to_string(),
            results: results.results().to_vec(),
            summary: results.summary(),
            analysis: self.analysis.clone(),
        })
    }
}
