use serde_json::Value;
use std::fmt;

/// Keys whose value stands in for an object-shaped answer, in lookup order.
const PRIMITIVE_KEYS: &[&str] = &["status", "value", "selected", "checked"];

/// A runtime answer reduced to the primitive the operators compare against.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Absent, null, blank text or an empty list.
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl Answer {
    /// Normalizes a raw JSON answer, unwrapping objects such as `{"status": "pass"}`.
    pub fn normalize(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Answer::Empty,
            Some(Value::Bool(b)) => Answer::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map(Answer::Number).unwrap_or(Answer::Empty),
            Some(Value::String(s)) if s.trim().is_empty() => Answer::Empty,
            Some(Value::String(s)) => Answer::Text(s.clone()),
            Some(Value::Array(items)) => {
                let list: Vec<String> = items
                    .iter()
                    .filter_map(|item| Answer::normalize(Some(item)).as_text())
                    .collect();
                if list.is_empty() {
                    Answer::Empty
                } else {
                    Answer::List(list)
                }
            }
            Some(Value::Object(map)) => PRIMITIVE_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map(|inner| Answer::normalize(Some(inner)))
                .unwrap_or(Answer::Empty),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Answer::Empty)
    }

    /// The answer as comparison text. Lists have no single text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Answer::Empty | Answer::List(_) => None,
            Answer::Bool(b) => Some(b.to_string()),
            Answer::Number(n) => Some(format_number(*n)),
            Answer::Text(s) => Some(s.clone()),
        }
    }

    /// The answer as a float, if it is numeric or numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            Answer::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// The answer as a list of items; a scalar is a one-element list.
    pub fn items(&self) -> Vec<String> {
        match self {
            Answer::List(items) => items.clone(),
            other => other.as_text().into_iter().collect(),
        }
    }

    /// Whether the answer equals `expected`, textually or numerically.
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            Answer::Empty => false,
            Answer::List(items) => items.iter().any(|item| item == expected),
            Answer::Number(n) => {
                parse_number(expected) == Some(*n) || format_number(*n) == expected
            }
            other => other.as_text().is_some_and(|text| text == expected),
        }
    }

    pub fn is_checked(&self) -> bool {
        match self {
            Answer::Empty => false,
            Answer::Bool(b) => *b,
            Answer::Number(n) => *n != 0.0,
            Answer::Text(s) => !s.trim().eq_ignore_ascii_case("false"),
            Answer::List(_) => true,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Empty => write!(f, "empty"),
            Answer::Bool(b) => write!(f, "{}", b),
            Answer::Number(n) => write!(f, "{}", format_number(*n)),
            Answer::Text(s) => write!(f, "\"{}\"", s),
            Answer::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Parses operand text as a float; blank or non-numeric text yields `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whole numbers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
