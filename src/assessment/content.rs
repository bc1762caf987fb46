//! Local question content used when the backend cannot be reached.
//!
//! Output depends on the level (and the enabled question types) only, so an
//! offline session is fully reproducible. Bump [`CONTENT_VERSION`] whenever a
//! template changes.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::question::{
    AnswerOption, GestureQuestion, MatchQuestion, McqQuestion, MemoryQuestion, Question,
    QuestionKind, QuestionKinds, MEMORY_DISPLAY_MS,
};
use crate::gesture::classifier::CATALOGUE;

pub const CONTENT_VERSION: u32 = 1;

const SHAPES: [(&str, &str); 4] = [
    ("⭐", "Star"),
    ("⚫", "Circle"),
    ("🔺", "Triangle"),
    ("⬛", "Square"),
];

fn addition(level: u32) -> Question {
    let a = i64::from(level);
    let b = a + 1;
    let sum = a + b;
    // rotate the correct slot with the level
    let correct_answer = (level % 4) as usize;
    let options = (0..4)
        .map(|slot| AnswerOption::Number(sum + slot as i64 - correct_answer as i64))
        .collect();

    Question::Mcq(McqQuestion {
        question: format!("{a} + {b} = ?"),
        options,
        correct_answer,
    })
}

fn sequence(level: u32) -> Question {
    let start = i64::from(level);
    let next = start + 6;
    Question::Mcq(McqQuestion {
        question: format!("What comes next? {}, {}, {}, ?", start, start + 2, start + 4),
        options: vec![
            AnswerOption::Number(next - 1),
            AnswerOption::Number(next),
            AnswerOption::Number(next + 2),
            AnswerOption::Number(next + 4),
        ],
        correct_answer: 1,
    })
}

fn recall(level: u32) -> Question {
    let answer = format!("{}-{}-{}", level, level + 3, level + 5);
    Question::Memory(MemoryQuestion {
        question: "Remember the numbers".to_string(),
        memory: format!("Remember: {answer}"),
        answer,
        display_ms: MEMORY_DISPLAY_MS,
    })
}

fn gesture(level: u32) -> Question {
    let target = &CATALOGUE[level as usize % CATALOGUE.len()];
    Question::Gesture(GestureQuestion {
        question: "Show gesture".to_string(),
        target_gesture: target.symbol.to_string(),
    })
}

fn shapes(level: u32) -> Question {
    let first = SHAPES[level as usize % SHAPES.len()];
    let second = SHAPES[(level as usize + 1) % SHAPES.len()];
    Question::Match(MatchQuestion {
        question: "Match shapes".to_string(),
        left_items: vec![first.0.to_string(), second.0.to_string()],
        right_items: vec![second.1.to_string(), first.1.to_string()],
        correct_matches: BTreeMap::from([(0, 1), (1, 0)]),
    })
}

type Template = (QuestionKind, fn(u32) -> Question);

const TEMPLATES: [Template; 5] = [
    (QuestionKind::Mcq, addition),
    (QuestionKind::Memory, recall),
    (QuestionKind::Gesture, gesture),
    (QuestionKind::Match, shapes),
    (QuestionKind::Mcq, sequence),
];

/// `count` questions for `level`, cycling through the templates whose type is
/// enabled. Empty when no template type is enabled.
pub fn fallback_questions(level: u32, enabled: &QuestionKinds, count: usize) -> Vec<Question> {
    let templates: Vec<&Template> = TEMPLATES
        .iter()
        .filter(|(kind, _)| enabled.contains(*kind))
        .collect();

    if templates.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|i| {
            let (_, build) = templates[i % templates.len()];
            // repeats of a template move to a later level's numbers
            build(level + (i / templates.len()) as u32 * 10)
        })
        .collect()
}

/// Seeded in-place shuffle; the same seed and level always give the same order.
pub fn shuffle_questions(questions: &mut [Question], seed: u64, level: u32) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ u64::from(level).rotate_left(32));
    questions.shuffle(&mut rng);
}
