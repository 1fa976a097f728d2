use super::id::{ConditionId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A comparison a condition group applies to its field's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Is,
    IsNot,
    HigherThan,
    LowerThan,
    EqualTo,
    NotEqualTo,
    Between,
    Contains,
    DoesNotContain,
    IsChecked,
    IsNotChecked,
}

impl Operator {
    pub const ALL: &'static [Operator] = &[
        Operator::Is,
        Operator::IsNot,
        Operator::HigherThan,
        Operator::LowerThan,
        Operator::EqualTo,
        Operator::NotEqualTo,
        Operator::Between,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::IsChecked,
        Operator::IsNotChecked,
    ];

    /// The label shown in the builder's operator picker.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::HigherThan => "higher than",
            Operator::LowerThan => "lower than",
            Operator::EqualTo => "equal to",
            Operator::NotEqualTo => "not equal to",
            Operator::Between => "between",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does not contain",
            Operator::IsChecked => "is checked",
            Operator::IsNotChecked => "is not checked",
        }
    }

    /// The backend name of the operator.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Operator::Is => "one_of",
            Operator::IsNot => "not_one_of",
            Operator::HigherThan => "higher_than",
            Operator::LowerThan => "lower_than",
            Operator::EqualTo => "equal_to",
            Operator::NotEqualTo => "not_equal_to",
            Operator::Between => "between",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does_not_contain",
            Operator::IsChecked => "is_checked",
            Operator::IsNotChecked => "is_not_checked",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.label() == label)
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.wire_name() == name)
    }

    /// Operators that compare the answer as a float.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Operator::HigherThan
                | Operator::LowerThan
                | Operator::EqualTo
                | Operator::NotEqualTo
                | Operator::Between
        )
    }

    /// Operators whose wire payload is a list of candidate values.
    pub fn takes_value_list(&self) -> bool {
        matches!(
            self,
            Operator::Is | Operator::IsNot | Operator::Contains | Operator::DoesNotContain
        )
    }

    /// Checkbox operators carry no comparison value at all.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::IsChecked | Operator::IsNotChecked)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a builder operator label to its wire name; unrecognized labels become `"unknown"`.
pub fn wire_operator_name(label: &str) -> &'static str {
    Operator::from_label(label)
        .map(|op| op.wire_name())
        .unwrap_or("unknown")
}

/// The rule part of a condition group: an operator and its operands, kept as
/// the text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub operator: Operator,
    pub value: Option<String>,
    pub value2: Option<String>,
}

impl Condition {
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            value: None,
            value2: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_range(mut self, low: impl Into<String>, high: impl Into<String>) -> Self {
        self.value = Some(low.into());
        self.value2 = Some(high.into());
        self
    }

    pub fn is(value: impl Into<String>) -> Self {
        Self::new(Operator::Is).with_value(value)
    }

    pub fn is_not(value: impl Into<String>) -> Self {
        Self::new(Operator::IsNot).with_value(value)
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self::new(Operator::Contains).with_value(value)
    }

    pub fn between(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self::new(Operator::Between).with_range(low, high)
    }

    pub fn checked() -> Self {
        Self::new(Operator::IsChecked)
    }

    pub fn unchecked() -> Self {
        Self::new(Operator::IsNotChecked)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.value2) {
            (Some(low), Some(high)) => write!(f, "{} {} and {}", self.operator, low, high),
            (Some(value), None) => write!(f, "{} {}", self.operator, value),
            _ => write!(f, "{}", self.operator),
        }
    }
}

/// A condition attached to a logic-enabled field, gating the sub-tree in `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub id: ConditionId,
    /// The field this group belongs to.
    pub field: NodeId,
    pub condition: Condition,
    pub children: Vec<NodeId>,
}
