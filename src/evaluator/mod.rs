//! Conditional visibility.
//!
//! [`evaluate`] decides whether one condition group holds for an answer;
//! [`resolve_visibility`] applies every group in a procedure to a set of answers.

use crate::model::Condition;
use crate::trace::ConditionTrace;
use serde_json::Value;

mod answer;
mod engine;
mod visibility;

pub use answer::{Answer, format_number, parse_number};
pub use visibility::{Answers, VisibilityReport, is_visible, resolve_visibility, visible_nodes};

use engine::ConditionEngine;

/// Whether a condition holds for a raw runtime answer.
///
/// Numeric operators fail closed: an operand that does not parse as a float
/// makes the condition false.
pub fn evaluate(condition: &Condition, answer: Option<&Value>) -> bool {
    let normalized = Answer::normalize(answer);
    ConditionEngine::new(condition, &normalized).evaluate()
}

/// Like [`evaluate`], but keeps the normalized answer for explanation.
pub fn evaluate_traced(condition: &Condition, answer: Option<&Value>) -> ConditionTrace {
    let normalized = Answer::normalize(answer);
    let outcome = ConditionEngine::new(condition, &normalized).evaluate();
    ConditionTrace {
        condition: condition.clone(),
        answer: normalized,
        outcome,
    }
}
