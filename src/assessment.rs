//! The fixed wellness questionnaire and its derived 0-100 score.
//!
//! The questionnaire uses a symptom-severity scale: higher raw answers mean
//! more distress, so the final score inverts the raw sum. All ten questions
//! must be answered before a submission is accepted.

use std::collections::BTreeMap;

pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    /// Selectable option values, lowest (no distress) first.
    pub options: &'static [i32],
}

const SYMPTOM_OPTIONS: &[i32] = &[0, 1, 2, 3];
const FREQUENCY_OPTIONS: &[i32] = &[0, 1, 2, 3, 4, 5];

/// Ten questions; eight scored 0-3 and two scored 0-5, for a maximum raw
/// score of 34.
pub const QUESTIONS: &[Question] = &[
    Question {
        id: "q1",
        text: "Little interest or pleasure in doing things",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q2",
        text: "Feeling down, depressed, or hopeless",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q3",
        text: "Feeling nervous, anxious, or on edge",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q4",
        text: "Not being able to stop or control worrying",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q5",
        text: "Trouble falling or staying asleep",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q6",
        text: "Feeling tired or having little energy",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q7",
        text: "Trouble concentrating on everyday tasks",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q8",
        text: "Feeling bad about yourself",
        options: SYMPTOM_OPTIONS,
    },
    Question {
        id: "q9",
        text: "How often did stress interfere with your day this week?",
        options: FREQUENCY_OPTIONS,
    },
    Question {
        id: "q10",
        text: "How often did you feel overwhelmed this week?",
        options: FREQUENCY_OPTIONS,
    },
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AnswerError {
    #[error("missing answer for question {0}")]
    Missing(&'static str),
    #[error("unknown question id {0}")]
    UnknownQuestion(String),
    #[error("value {value} is not a valid option for question {id}")]
    OutOfRange { id: String, value: i32 },
}

/// Sum of the maximum option value over the full catalog.
pub fn max_raw_score() -> i32 {
    QUESTIONS
        .iter()
        .map(|q| q.options.iter().copied().max().unwrap_or(0))
        .sum()
}

/// Map a complete answer set to a wellness score in 0-100.
///
/// `round(100 - raw_sum / max_raw * 100)`: all-minimum answers score 100,
/// all-maximum score 0.
pub fn score(answers: &BTreeMap<String, i32>) -> Result<i32, AnswerError> {
    for (id, value) in answers {
        let question = QUESTIONS
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| AnswerError::UnknownQuestion(id.clone()))?;
        if !question.options.contains(value) {
            return Err(AnswerError::OutOfRange {
                id: id.clone(),
                value: *value,
            });
        }
    }

    let mut raw_sum = 0;
    for question in QUESTIONS {
        match answers.get(question.id) {
            Some(value) => raw_sum += value,
            None => return Err(AnswerError::Missing(question.id)),
        }
    }

    let max = max_raw_score();
    Ok((100.0 - raw_sum as f64 / max as f64 * 100.0).round() as i32)
}
