use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::classifier::{find_gesture, GestureDefinition};

pub const MEMORY_DISPLAY_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Memory,
    Gesture,
    Match,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::Mcq,
        QuestionKind::Memory,
        QuestionKind::Gesture,
        QuestionKind::Match,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Memory => "memory",
            QuestionKind::Gesture => "gesture",
            QuestionKind::Match => "match",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The question types a session is willing to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionKinds(Vec<QuestionKind>);

impl QuestionKinds {
    pub fn all() -> Self {
        Self(QuestionKind::ALL.to_vec())
    }

    pub fn only(kinds: impl IntoIterator<Item = QuestionKind>) -> Self {
        let mut kinds: Vec<_> = kinds.into_iter().collect();
        kinds.sort();
        kinds.dedup();
        Self(kinds)
    }

    pub fn contains(&self, kind: QuestionKind) -> bool {
        self.0.contains(&kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerOption {
    Number(i64),
    Text(String),
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerOption::Number(n) => write!(f, "{n}"),
            AnswerOption::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    pub options: Vec<AnswerOption>,
    pub correct_answer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryQuestion {
    #[serde(default)]
    pub question: String,
    pub memory: String,
    pub answer: String,
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

fn default_display_ms() -> u64 {
    MEMORY_DISPLAY_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureQuestion {
    #[serde(default)]
    pub question: String,
    pub target_gesture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuestion {
    pub question: String,
    pub left_items: Vec<String>,
    pub right_items: Vec<String>,
    pub correct_matches: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Question {
    Mcq(McqQuestion),
    Memory(MemoryQuestion),
    Gesture(GestureQuestion),
    Match(MatchQuestion),
    /// Any `type` tag this build does not know.
    #[serde(other)]
    Unsupported,
}

impl Question {
    pub fn kind(&self) -> Option<QuestionKind> {
        match self {
            Question::Mcq(_) => Some(QuestionKind::Mcq),
            Question::Memory(_) => Some(QuestionKind::Memory),
            Question::Gesture(_) => Some(QuestionKind::Gesture),
            Question::Match(_) => Some(QuestionKind::Match),
            Question::Unsupported => None,
        }
    }
}

/// What the child submitted. Serialized flat into the result record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Choice { selected: usize },
    Recall { input: String },
    Gesture { gesture: String },
    Matches { matches: BTreeMap<usize, usize> },
}

impl Response {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Response::Choice { .. } => QuestionKind::Mcq,
            Response::Recall { .. } => QuestionKind::Memory,
            Response::Gesture { .. } => QuestionKind::Gesture,
            Response::Matches { .. } => QuestionKind::Match,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("unsupported question type")]
    Unsupported,
    #[error("question type {0} is disabled for this session")]
    Disabled(QuestionKind),
    #[error("unknown gesture target {0:?}")]
    UnknownGesture(String),
    #[error("{got} response submitted to a {expected} question")]
    ResponseMismatch {
        expected: QuestionKind,
        got: QuestionKind,
    },
    #[error("option {selected} out of range ({options} options)")]
    OptionOutOfRange { selected: usize, options: usize },
    #[error("gesture questions are answered by the detection pipeline")]
    RequiresDetection,
}

/// A question resolved to the logic that handles it.
#[derive(Debug, Clone, Copy)]
pub enum Processor<'q> {
    Choice(&'q McqQuestion),
    Recall(&'q MemoryQuestion),
    Gesture {
        question: &'q GestureQuestion,
        definition: &'static GestureDefinition,
    },
    Match(&'q MatchQuestion),
}

impl Processor<'_> {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Processor::Choice(_) => QuestionKind::Mcq,
            Processor::Recall(_) => QuestionKind::Memory,
            Processor::Gesture { .. } => QuestionKind::Gesture,
            Processor::Match(_) => QuestionKind::Match,
        }
    }

    /// Scores a submitted response. Gesture questions are never scored here;
    /// only a confirmed detection can answer them.
    pub fn evaluate(&self, response: &Response) -> Result<bool, QuestionError> {
        match (self, response) {
            (Processor::Choice(q), Response::Choice { selected }) => {
                if *selected >= q.options.len() {
                    return Err(QuestionError::OptionOutOfRange {
                        selected: *selected,
                        options: q.options.len(),
                    });
                }
                Ok(*selected == q.correct_answer)
            }
            (Processor::Recall(q), Response::Recall { input }) => Ok(input.trim() == q.answer.trim()),
            (Processor::Gesture { .. }, _) => Err(QuestionError::RequiresDetection),
            (Processor::Match(q), Response::Matches { matches }) => {
                let complete = (0..q.left_items.len()).all(|i| matches.contains_key(&i));
                Ok(complete && *matches == q.correct_matches)
            }
            (processor, response) => Err(QuestionError::ResponseMismatch {
                expected: processor.kind(),
                got: response.kind(),
            }),
        }
    }
}

/// Maps a question to its processor. Unknown and disabled types are
/// reported, never skipped.
pub fn dispatch<'q>(
    question: &'q Question,
    enabled: &QuestionKinds,
) -> Result<Processor<'q>, QuestionError> {
    let kind = question.kind().ok_or(QuestionError::Unsupported)?;
    if !enabled.contains(kind) {
        return Err(QuestionError::Disabled(kind));
    }

    Ok(match question {
        Question::Mcq(q) => Processor::Choice(q),
        Question::Memory(q) => Processor::Recall(q),
        Question::Gesture(q) => {
            let definition = find_gesture(&q.target_gesture)
                .ok_or_else(|| QuestionError::UnknownGesture(q.target_gesture.clone()))?;
            Processor::Gesture {
                question: q,
                definition,
            }
        }
        Question::Match(q) => Processor::Match(q),
        Question::Unsupported => return Err(QuestionError::Unsupported),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_one_mcq() -> Question {
        Question::Mcq(McqQuestion {
            question: "1 + 1 = ?".into(),
            options: (1..=4).map(AnswerOption::Number).collect(),
            correct_answer: 1,
        })
    }

    #[test]
    fn test_mcq_scoring() {
        let question = level_one_mcq();
        let processor = dispatch(&question, &QuestionKinds::all()).unwrap();
        assert!(processor.evaluate(&Response::Choice { selected: 1 }).unwrap());
        assert!(!processor.evaluate(&Response::Choice { selected: 0 }).unwrap());
        assert_eq!(
            processor.evaluate(&Response::Choice { selected: 4 }),
            Err(QuestionError::OptionOutOfRange {
                selected: 4,
                options: 4
            })
        );
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let question: Question =
            serde_json::from_str(r#"{"type":"drawing","question":"Draw a cat"}"#).unwrap();
        assert_eq!(question, Question::Unsupported);
        assert_eq!(
            dispatch(&question, &QuestionKinds::all()).err(),
            Some(QuestionError::Unsupported)
        );
    }

    #[test]
    fn test_disabled_type_rejected() {
        let question = level_one_mcq();
        let enabled = QuestionKinds::only([QuestionKind::Gesture]);
        assert_eq!(
            dispatch(&question, &enabled).err(),
            Some(QuestionError::Disabled(QuestionKind::Mcq))
        );
    }

    #[test]
    fn test_wire_format_parses() {
        let raw = r#"[
            {"type":"mcq","question":"2 + 3 = ?","options":[4,5,6,7],"correct_answer":1},
            {"type":"memory","memory":"Remember: 3-6-8","answer":"3-6-8"},
            {"type":"gesture","question":"Show gesture","target_gesture":"✌️"},
            {"type":"match","question":"Match shapes","left_items":["⭐","⚫"],
             "right_items":["Circle","Star"],"correct_matches":{"0":1,"1":0}}
        ]"#;
        let questions: Vec<Question> = serde_json::from_str(raw).unwrap();
        let kinds: Vec<_> = questions.iter().filter_map(Question::kind).collect();
        assert_eq!(kinds, QuestionKind::ALL.to_vec());

        match &questions[1] {
            Question::Memory(q) => assert_eq!(q.display_ms, MEMORY_DISPLAY_MS),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_memory_trims_input() {
        let question = Question::Memory(MemoryQuestion {
            question: String::new(),
            memory: "Remember: 2-5-7".into(),
            answer: "2-5-7".into(),
            display_ms: MEMORY_DISPLAY_MS,
        });
        let processor = dispatch(&question, &QuestionKinds::all()).unwrap();
        assert!(processor
            .evaluate(&Response::Recall { input: "  2-5-7 ".into() })
            .unwrap());
        assert!(!processor
            .evaluate(&Response::Recall { input: "2-5".into() })
            .unwrap());
    }

    #[test]
    fn test_match_requires_every_pair() {
        let question = Question::Match(MatchQuestion {
            question: "Match shapes".into(),
            left_items: vec!["⭐".into(), "⚫".into()],
            right_items: vec!["Circle".into(), "Star".into()],
            correct_matches: BTreeMap::from([(0, 1), (1, 0)]),
        });
        let processor = dispatch(&question, &QuestionKinds::all()).unwrap();

        let full = BTreeMap::from([(0, 1), (1, 0)]);
        let partial = BTreeMap::from([(0, 1)]);
        assert!(processor.evaluate(&Response::Matches { matches: full }).unwrap());
        assert!(!processor.evaluate(&Response::Matches { matches: partial }).unwrap());
    }

    #[test]
    fn test_gesture_dispatch_resolves_target() {
        let question = Question::Gesture(GestureQuestion {
            question: "Show gesture".into(),
            target_gesture: "🤘".into(),
        });
        assert_eq!(
            dispatch(&question, &QuestionKinds::all()).err(),
            Some(QuestionError::UnknownGesture("🤘".into()))
        );
    }

    #[test]
    fn test_gesture_response_needs_detection() {
        let question = Question::Gesture(GestureQuestion {
            question: "Show gesture".into(),
            target_gesture: "✌️".into(),
        });
        let processor = dispatch(&question, &QuestionKinds::all()).unwrap();
        assert_eq!(
            processor.evaluate(&Response::Gesture {
                gesture: "two_fingers".into()
            }),
            Err(QuestionError::RequiresDetection)
        );
    }

    #[test]
    fn test_response_mismatch() {
        let question = level_one_mcq();
        let processor = dispatch(&question, &QuestionKinds::all()).unwrap();
        assert_eq!(
            processor.evaluate(&Response::Recall { input: "2".into() }),
            Err(QuestionError::ResponseMismatch {
                expected: QuestionKind::Mcq,
                got: QuestionKind::Memory
            })
        );
    }
}
