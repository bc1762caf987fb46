use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{AnalysisSummary, AssessmentBackend, BackendError, SessionContext};
use crate::assessment::question::Question;
use crate::assessment::results::QuestionResult;
use crate::config::Config;
use crate::gesture::pipeline::GestureMetrics;

#[derive(Debug, Deserialize)]
struct QuestionSet {
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct ResultEnvelope<'a> {
    session_id: &'a str,
    #[serde(flatten)]
    result: &'a QuestionResult,
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    session_id: &'a str,
    results: &'a [QuestionResult],
}

/// JSON-over-HTTP client for the assessment API. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self::with_client(&config.api_base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, BackendError> {
        let url = self.url(path);
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(%url, %status, "backend rejected request");
            return Err(BackendError::HttpStatus { status, body });
        }

        Ok(resp.bytes().await?.to_vec())
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let bytes = self.post(path, body).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                path,
                body = %String::from_utf8_lossy(&bytes),
                "failed to parse backend response: {}",
                e
            );
            BackendError::Json(e)
        })
    }
}

#[async_trait]
impl AssessmentBackend for HttpBackend {
    async fn fetch_questions(
        &self,
        level: u32,
        context: &SessionContext,
    ) -> Result<Vec<Question>, BackendError> {
        let set: QuestionSet = self
            .post_json(&format!("/api/level/{level}/questions"), context)
            .await?;
        Ok(set.questions)
    }

    async fn submit_result(
        &self,
        session_id: &str,
        result: &QuestionResult,
    ) -> Result<(), BackendError> {
        let envelope = ResultEnvelope { session_id, result };
        self.post("/api/response", &envelope).await.map(|_| ())
    }

    async fn submit_analysis(
        &self,
        session_id: &str,
        results: &[QuestionResult],
    ) -> Result<AnalysisSummary, BackendError> {
        let request = AnalysisRequest {
            session_id,
            results,
        };
        self.post_json("/api/analysis", &request).await
    }

    async fn submit_gesture_metrics(&self, metrics: &GestureMetrics) -> Result<(), BackendError> {
        self.post("/api/gesture-test/results", metrics).await.map(|_| ())
    }
}
