use super::ConditionTrace;
use crate::model::Condition;

/// Formats condition traces into human-readable strings.
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a trace as `answer (was 15) between 10 and 20 -> shown`.
    pub fn format_trace(trace: &ConditionTrace) -> String {
        format!(
            "answer (was {}) {} -> {}",
            trace.answer,
            Self::format_condition(&trace.condition),
            if trace.outcome { "shown" } else { "hidden" }
        )
    }

    /// Numeric operands print bare; everything else is quoted.
    fn format_condition(condition: &Condition) -> String {
        match (&condition.value, &condition.value2) {
            (Some(low), Some(high)) => format!("{} {} and {}", condition.operator, low, high),
            (Some(value), None) if condition.operator.is_numeric() => {
                format!("{} {}", condition.operator, value)
            }
            (Some(value), None) => format!("{} \"{}\"", condition.operator, value),
            _ => condition.operator.to_string(),
        }
    }
}
