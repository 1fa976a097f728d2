use crate::evaluator::Answer;
use crate::model::Condition;

pub mod formatter;

pub use formatter::TraceFormatter;

/// A record of how one condition was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTrace {
    pub condition: Condition,
    /// The answer after normalization.
    pub answer: Answer,
    pub outcome: bool,
}
