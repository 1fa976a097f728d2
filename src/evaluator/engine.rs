use super::answer::{Answer, parse_number};
use crate::model::{Condition, Operator};

// This macro generates a fail-closed numeric comparison against `value`.
macro_rules! compare_op {
    ($answer:expr, $condition:expr, $op_fn:expr) => {
        match (
            $answer.as_number(),
            $condition.value.as_deref().and_then(parse_number),
        ) {
            (Some(a), Some(b)) => $op_fn(a, b),
            _ => false,
        }
    };
}

/// Applies one condition to a normalized answer.
pub(super) struct ConditionEngine<'a> {
    condition: &'a Condition,
    answer: &'a Answer,
}

impl<'a> ConditionEngine<'a> {
    pub(super) fn new(condition: &'a Condition, answer: &'a Answer) -> Self {
        Self { condition, answer }
    }

    pub(super) fn evaluate(&self) -> bool {
        let answer = self.answer;
        // An unanswered field only ever satisfies "is not checked".
        if answer.is_empty() {
            return self.condition.operator == Operator::IsNotChecked;
        }
        let expected = self.condition.value.as_deref();

        match self.condition.operator {
            Operator::Is => expected.is_some_and(|v| answer.matches(v)),
            Operator::IsNot => expected.is_some_and(|v| !answer.matches(v)),
            Operator::Contains => expected.is_some_and(|v| answer.items().iter().any(|i| i == v)),
            Operator::DoesNotContain => {
                expected.is_some_and(|v| !answer.items().iter().any(|i| i == v))
            }
            Operator::IsChecked => answer.is_checked(),
            Operator::IsNotChecked => !answer.is_checked(),

            Operator::HigherThan => compare_op!(answer, self.condition, |a, b| a > b),
            Operator::LowerThan => compare_op!(answer, self.condition, |a, b| a < b),
            Operator::EqualTo => compare_op!(answer, self.condition, |a, b| a == b),
            Operator::NotEqualTo => compare_op!(answer, self.condition, |a, b| a != b),
            Operator::Between => self.between(),
        }
    }

    /// Inclusive, and independent of which operand is the lower bound.
    fn between(&self) -> bool {
        let low = self.condition.value.as_deref().and_then(parse_number);
        let high = self.condition.value2.as_deref().and_then(parse_number);
        match (self.answer.as_number(), low, high) {
            (Some(a), Some(x), Some(y)) => x.min(y) <= a && a <= x.max(y),
            _ => false,
        }
    }
}
