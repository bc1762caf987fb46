use chrono::{DateTime, Utc};
use serde::Serialize;

use super::question::{QuestionKind, Response};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingMetrics {
    pub time_taken: u64,
    #[serde(rename = "attentionLost", skip_serializing_if = "Option::is_none")]
    pub attention_lost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sluggishness: Option<u32>,
}

impl TimingMetrics {
    pub fn elapsed(time_taken_ms: u64) -> Self {
        Self {
            time_taken: time_taken_ms,
            attention_lost: None,
            sluggishness: None,
        }
    }
}

/// One answered question. Serializes to the flat record the backend expects:
/// `{level, qIndex, type, <response fields>, time_taken, ..., correct}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub level: u32,
    #[serde(rename = "qIndex")]
    pub q_index: usize,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(flatten)]
    pub response: Response,
    #[serde(flatten)]
    pub timing: TimingMetrics,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub level: u32,
    pub answered: usize,
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub mean_time_ms: f64,
    pub levels: Vec<LevelSummary>,
}

/// Append-only, arrival-ordered record of a session's answers.
#[derive(Debug, Clone, Default)]
pub struct ResultsAggregator {
    results: Vec<QuestionResult>,
}

impl ResultsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, result: QuestionResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> ResultSummary {
        let total = self.results.len();
        let correct = self.results.iter().filter(|r| r.correct).count();

        let accuracy = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };

        let mean_time_ms = if total > 0 {
            self.results.iter().map(|r| r.timing.time_taken as f64).sum::<f64>() / total as f64
        } else {
            0.0
        };

        let mut levels: Vec<LevelSummary> = Vec::new();
        for result in &self.results {
            match levels.iter_mut().find(|l| l.level == result.level) {
                Some(entry) => {
                    entry.answered += 1;
                    entry.correct += usize::from(result.correct);
                }
                None => levels.push(LevelSummary {
                    level: result.level,
                    answered: 1,
                    correct: usize::from(result.correct),
                }),
            }
        }

        ResultSummary {
            total,
            correct,
            accuracy,
            mean_time_ms,
            levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(level: u32, q_index: usize, correct: bool, time_taken: u64) -> QuestionResult {
        QuestionResult {
            level,
            q_index,
            kind: QuestionKind::Mcq,
            response: Response::Choice { selected: 1 },
            timing: TimingMetrics::elapsed(time_taken),
            correct,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_records_in_arrival_order() {
        let mut aggregator = ResultsAggregator::new();
        aggregator.record(choice(1, 0, true, 1000));
        aggregator.record(choice(1, 1, false, 3000));
        aggregator.record(choice(2, 0, true, 2000));

        let order: Vec<_> = aggregator.results().iter().map(|r| (r.level, r.q_index)).collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_summary() {
        let mut aggregator = ResultsAggregator::new();
        aggregator.record(choice(1, 0, true, 1000));
        aggregator.record(choice(1, 1, false, 3000));
        aggregator.record(choice(2, 0, true, 2000));

        let summary = aggregator.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 2);
        assert!((summary.mean_time_ms - 2000.0).abs() < 1e-9);
        assert_eq!(
            summary.levels,
            vec![
                LevelSummary { level: 1, answered: 2, correct: 1 },
                LevelSummary { level: 2, answered: 1, correct: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = ResultsAggregator::new().summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert!(summary.levels.is_empty());
    }

    #[test]
    fn test_result_serializes_flat() {
        let mut result = choice(1, 0, true, 1200);
        result.timing.attention_lost = Some(1);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["level"], 1);
        assert_eq!(json["qIndex"], 0);
        assert_eq!(json["type"], "mcq");
        assert_eq!(json["selected"], 1);
        assert_eq!(json["time_taken"], 1200);
        assert_eq!(json["attentionLost"], 1);
        assert!(json.get("sluggishness").is_none());
        assert_eq!(json["correct"], true);
    }
}
