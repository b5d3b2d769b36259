use super::evaluator::coerce_number;
use crate::schema::Condition;
use std::fmt;

/// A record of how a visibility rule was evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTrace {
    pub outcome: bool,
    /// Id of the controlling field.
    pub source: String,
    /// The controlling answer as stored, `None` if unset.
    pub answer: Option<String>,
    pub condition: Condition,
    pub operand: Option<String>,
}

impl fmt::Display for ConditionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TraceFormatter::format_trace(self))
    }
}

/// Formats condition traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a trace such as `$age (was 70) >= 65`.
    pub fn format_trace(trace: &ConditionTrace) -> String {
        let subject = format!("${} ({})", trace.source, Self::format_answer(&trace.answer));

        match (&trace.condition, &trace.operand) {
            (Condition::Exists | Condition::NotExists, _) => {
                format!("{} {}", subject, trace.condition.symbol())
            }
            (Condition::Unknown(name), _) => {
                format!("{} ? (unknown condition '{}')", subject, name)
            }
            (condition, None) => {
                format!("{} {} <missing> (no operand)", subject, condition.symbol())
            }
            (condition, Some(operand)) => format!(
                "{} {} {}",
                subject,
                condition.symbol(),
                Self::format_value(operand)
            ),
        }
    }

    fn format_answer(answer: &Option<String>) -> String {
        match answer {
            Some(value) => format!("was {}", Self::format_value(value)),
            None => "unset".to_string(),
        }
    }

    /// Numbers are shown bare, everything else quoted.
    fn format_value(value: &str) -> String {
        if coerce_number(value).is_nan() {
            format!("{:?}", value)
        } else {
            value.trim().to_string()
        }
    }
}
