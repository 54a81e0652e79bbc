//! # Quiz Engine
//!
//! Turns a [`Question`] definition into a concrete problem and checks
//! answers against it. The engine returns plain [`QuizOutcome`] values;
//! showing messages is up to whoever consumes them.

use crate::game::{OperandRange, OperationKind, PlayState, Question};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One instantiated problem awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizInstance {
    pub source_question_id: String,
    pub operand_a: u32,
    pub operand_b: u32,
    pub operation: OperationKind,
    pub correct_result: u64,
    /// Last parsed answer, kept so the overlay can show it
    pub submitted_value: Option<String>,
}

impl QuizInstance {
    /// Draws operands uniformly from the question's inclusive ranges.
    ///
    /// Subtraction swaps the operands so the larger one is the minuend and
    /// the result is never negative. The result is widened so that no pair
    /// of `u32` operands can overflow.
    pub fn generate<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        let a = draw(question.operand_a, rng);
        let b = draw(question.operand_b, rng);

        let (operand_a, operand_b, correct_result) = match question.operation {
            OperationKind::Addition => (a, b, u64::from(a) + u64::from(b)),
            OperationKind::Subtraction => {
                let (bigger, smaller) = if a >= b { (a, b) } else { (b, a) };
                (bigger, smaller, u64::from(bigger - smaller))
            }
        };

        log::debug!(
            "generated quiz for {}: {} {} {}",
            question.id,
            operand_a,
            question.operation.symbol(),
            operand_b
        );

        Self {
            source_question_id: question.id.clone(),
            operand_a,
            operand_b,
            operation: question.operation,
            correct_result,
            submitted_value: None,
        }
    }

    /// The problem as shown to the player, e.g. `7 - 3 = ?`.
    pub fn prompt(&self) -> String {
        format!(
            "{} {} {} = ?",
            self.operand_a,
            self.operation.symbol(),
            self.operand_b
        )
    }

    /// Classifies a raw answer without changing any state.
    pub fn check(&self, raw: &str) -> QuizOutcome {
        match parse_answer(raw) {
            None => QuizOutcome::Invalid,
            Some(value) if value == self.correct_result as f64 => QuizOutcome::Correct,
            Some(_) => QuizOutcome::Incorrect,
        }
    }
}

fn draw<R: Rng + ?Sized>(range: OperandRange, rng: &mut R) -> u32 {
    rng.gen_range(range.min..=range.max)
}

/// Result of submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    Correct,
    Incorrect,
    /// The input was not a number
    Invalid,
}

impl QuizOutcome {
    /// User-facing feedback for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            QuizOutcome::Correct => "Correct, well done!",
            QuizOutcome::Incorrect => "Not quite, try another answer.",
            QuizOutcome::Invalid => "That is not a number, try again.",
        }
    }
}

/// Parses a typed answer.
///
/// Surrounding whitespace is ignored and a decimal comma is accepted. Empty
/// input and non-finite values are rejected.
///
/// # Examples
///
/// ```
/// use math_forest::parse_answer;
///
/// assert_eq!(parse_answer(" 12 "), Some(12.0));
/// assert_eq!(parse_answer("2,5"), Some(2.5));
/// assert_eq!(parse_answer("abc"), None);
/// assert_eq!(parse_answer(""), None);
/// ```
pub fn parse_answer(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replacen(',', ".", 1);
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Opens a quiz for `question` unless one is already active or the question
/// is solved. Returns whether a quiz was opened.
pub fn activate<R: Rng + ?Sized>(state: &mut PlayState, question: &Question, rng: &mut R) -> bool {
    if state.active_quiz.is_some() || state.is_solved(&question.id) {
        return false;
    }
    state.active_quiz = Some(QuizInstance::generate(question, rng));
    true
}

/// Submits an answer to the active quiz.
///
/// Returns None when no quiz is active. A correct answer marks the question
/// solved and closes the quiz; anything else leaves the same problem open.
pub fn submit(state: &mut PlayState, raw: &str) -> Option<QuizOutcome> {
    let quiz = state.active_quiz.as_mut()?;
    let outcome = quiz.check(raw);
    if outcome != QuizOutcome::Invalid {
        quiz.submitted_value = Some(raw.trim().to_string());
    }

    if outcome == QuizOutcome::Correct {
        if let Some(quiz) = state.active_quiz.take() {
            state.mark_solved(&quiz.source_question_id);
            log::info!(
                "solved {} ({} total)",
                quiz.source_question_id,
                state.solved_count()
            );
        }
    }

    Some(outcome)
}

/// Closes the active quiz without solving it. Returns whether one was open.
pub fn cancel(state: &mut PlayState) -> bool {
    state.active_quiz.take().is_some()
}
