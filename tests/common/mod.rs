#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use quest_assessment::assessment::{ChildProfile, Question, Response};
use quest_assessment::gesture::{Landmark, LandmarkFrame, SensorTick, HAND_LANDMARK_COUNT};

// ============================================================================
// Synthetic hands
// ============================================================================

/// y values for (base, middle, upper, tip) of each finger column.
const RAISED: [f64; 4] = [0.70, 0.55, 0.47, 0.40];
const CURLED: [f64; 4] = [0.70, 0.62, 0.66, 0.68];
const THUMB_RAISED: [f64; 4] = [0.78, 0.65, 0.55, 0.45];
const THUMB_CURLED: [f64; 4] = [0.78, 0.72, 0.70, 0.74];

/// A 21-point hand with the given fingers (thumb, index, middle, ring, pinky)
/// raised. `pinch` moves the thumb tip onto the index tip.
pub fn hand(raised: [bool; 5], pinch: bool, confidence: f64, at_ms: u64) -> LandmarkFrame {
    let mut points = vec![Landmark::new(0.5, 0.9); HAND_LANDMARK_COUNT];

    for (finger, up) in raised.iter().enumerate() {
        let ys = match (finger, up) {
            (0, true) => THUMB_RAISED,
            (0, false) => THUMB_CURLED,
            (_, true) => RAISED,
            (_, false) => CURLED,
        };
        let x = 0.3 + finger as f64 * 0.1;
        let start = 1 + finger * 4;
        for (offset, y) in ys.into_iter().enumerate() {
            points[start + offset] = Landmark::new(x, y);
        }
    }

    if pinch {
        let index_tip = points[8];
        points[4] = Landmark::new(index_tip.x + 0.01, index_tip.y + 0.01);
    }

    LandmarkFrame::new(points, confidence, at_ms)
}

pub fn pose_for(gesture: &str, at_ms: u64) -> LandmarkFrame {
    match gesture {
        "open_palm" => hand([true; 5], false, 0.95, at_ms),
        "two_fingers" => hand([false, true, true, false, false], false, 0.95, at_ms),
        "ok_sign" => hand([true; 5], true, 0.95, at_ms),
        "thumbs_up" => hand([true, false, false, false, false], false, 0.95, at_ms),
        other => panic!("no synthetic pose for {other}"),
    }
}

/// `count` ticks of `gesture`, one every 33ms after `start_ms`.
pub fn steady_ticks(gesture: &str, start_ms: u64, count: usize) -> Vec<SensorTick> {
    (1..=count as u64)
        .map(|i| {
            let now = start_ms + i * 33;
            SensorTick::hand(pose_for(gesture, now), now)
        })
        .collect()
}

pub fn profile() -> ChildProfile {
    ChildProfile {
        name: "Ayo".into(),
        age: 8,
    }
}

/// The correct answer for an mcq, memory or match question. Gesture questions
/// are answered with frames, not responses.
pub fn correct_response(question: &Question) -> Response {
    match question {
        Question::Mcq(q) => Response::Choice {
            selected: q.correct_answer,
        },
        Question::Memory(q) => Response::Recall {
            input: q.answer.clone(),
        },
        Question::Match(q) => Response::Matches {
            matches: q.correct_matches.clone(),
        },
        Question::Gesture(_) | Question::Unsupported => {
            panic!("no response answers {question:?}")
        }
    }
}

// ============================================================================
// Mock assessment API
// ============================================================================

#[derive(Clone, Default)]
pub struct MockState {
    pub requests: Arc<Mutex<Vec<(String, Value)>>>,
    pub fail: Arc<AtomicBool>,
    pub questions: Arc<Mutex<Option<Vec<Value>>>>,
}

impl MockState {
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn serve_questions(&self, questions: Vec<Value>) {
        *self.questions.lock().unwrap() = Some(questions);
    }

    pub fn bodies_for(&self, path: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn log(&self, uri: &Uri, body: Value) {
        self.requests
            .lock()
            .unwrap()
            .push((uri.path().to_string(), body));
    }

    fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
    server: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn mcq(level: u32) -> Value {
    json!({
        "type": "mcq",
        "question": format!("Level {level}: 1 + 1 = ?"),
        "options": [1, 2, 3, 4],
        "correct_answer": 1
    })
}

async fn questions(
    State(state): State<MockState>,
    Path(level): Path<u32>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.log(&uri, body);
    if state.failing() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let served = state.questions.lock().unwrap().clone();
    let questions = served.unwrap_or_else(|| (0..4).map(|_| mcq(level)).collect());
    Ok(Json(json!({ "questions": questions })))
}

async fn ack(
    State(state): State<MockState>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.log(&uri, body);
    if state.failing() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({ "ok": true })))
}

async fn analysis(
    State(state): State<MockState>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let answered = body["results"].as_array().map(Vec::len).unwrap_or(0);
    state.log(&uri, body);
    if state.failing() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({ "answered": answered, "profile": "steady" })))
}

pub async fn spawn_mock_backend() -> MockBackend {
    let state = MockState::default();
    let app = Router::new()
        .route("/api/level/:level/questions", post(questions))
        .route("/api/response", post(ack))
        .route("/api/analysis", post(analysis))
        .route("/api/gesture-test/results", post(ack))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        state,
        server,
    }
}
