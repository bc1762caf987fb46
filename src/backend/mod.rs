//! Assessment backend adapter.
//!
//! Every call may fail with [`BackendError`]; callers degrade to local
//! behaviour and never retry.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::assessment::question::Question;
use crate::assessment::results::QuestionResult;
use crate::gesture::pipeline::GestureMetrics;

/// Free-form analysis document returned by `POST /api/analysis`.
pub type AnalysisSummary = serde_json::Value;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend offline")]
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub session_id: String,
    pub child_age: u8,
}

#[async_trait]
pub trait AssessmentBackend: Send + Sync {
    async fn fetch_questions(
        &self,
        level: u32,
        context: &SessionContext,
    ) -> Result<Vec<Question>, BackendError>;

    async fn submit_result(
        &self,
        session_id: &str,
        result: &QuestionResult,
    ) -> Result<(), BackendError>;

    async fn submit_analysis(
        &self,
        session_id: &str,
        results: &[QuestionResult],
    ) -> Result<AnalysisSummary, BackendError>;

    async fn submit_gesture_metrics(&self, metrics: &GestureMetrics) -> Result<(), BackendError>;
}

/// Backend that is never reachable. Sessions run entirely on local content.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

#[async_trait]
impl AssessmentBackend for OfflineBackend {
    async fn fetch_questions(
        &self,
        _level: u32,
        _context: &SessionContext,
    ) -> Result<Vec<Question>, BackendError> {
        Err(BackendError::Offline)
    }

    async fn submit_result(
        &self,
        _session_id: &str,
        _result: &QuestionResult,
    ) -> Result<(), BackendError> {
        Err(BackendError::Offline)
    }

    async fn submit_analysis(
        &self,
        _session_id: &str,
        _results: &[QuestionResult],
    ) -> Result<AnalysisSummary, BackendError> {
        Err(BackendError::Offline)
    }

    async fn submit_gesture_metrics(&self, _metrics: &GestureMetrics) -> Result<(), BackendError> {
        Err(BackendError::Offline)
    }
}
