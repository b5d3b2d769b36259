use super::trace::ConditionTrace;
use crate::answers::Answers;
use crate::schema::{Condition, Rule};

// Numeric comparison of two stored strings. Anything that is not a finite
// number becomes NaN, so the comparison is false.
macro_rules! compare_numbers {
    ($answer:expr, $operand:expr, $op:tt) => {
        coerce_number($answer) $op coerce_number($operand)
    };
}

/// Evaluates structured visibility rules against one answers snapshot.
pub(super) struct ConditionEngine<'a> {
    answers: &'a Answers,
}

impl<'a> ConditionEngine<'a> {
    pub(super) fn new(answers: &'a Answers) -> Self {
        Self { answers }
    }

    pub(super) fn evaluate(&self, rule: &Rule) -> bool {
        let answer = self.answers.get(&rule.depends_on);
        let present = answer.filter(|value| !value.is_empty());

        match (&rule.condition, rule.value.as_deref()) {
            (Condition::Exists, _) => present.is_some(),
            (Condition::NotExists, _) => present.is_none(),
            (Condition::Unknown(_), _) | (_, None) => false,

            // --- Equality ---
            (Condition::Equals, Some(operand)) => answer == Some(operand),
            (Condition::NotEquals, Some(operand)) => answer != Some(operand),

            // --- Ordering ---
            (Condition::GreaterThan, Some(operand)) => {
                compare_numbers!(answer.unwrap_or(""), operand, >)
            }
            (Condition::LessThan, Some(operand)) => {
                compare_numbers!(answer.unwrap_or(""), operand, <)
            }
            (Condition::GreaterThanOrEqual, Some(operand)) => {
                compare_numbers!(answer.unwrap_or(""), operand, >=)
            }
            (Condition::LessThanOrEqual, Some(operand)) => {
                compare_numbers!(answer.unwrap_or(""), operand, <=)
            }

            // --- Substring ---
            (Condition::Contains, Some(operand)) => {
                present.is_some_and(|value| value.contains(operand))
            }
            (Condition::NotContains, Some(operand)) => {
                present.is_some_and(|value| !value.contains(operand))
            }
        }
    }

    /// Evaluates the rule and records what it looked at.
    pub(super) fn explain(&self, rule: &Rule) -> ConditionTrace {
        ConditionTrace {
            outcome: self.evaluate(rule),
            source: rule.depends_on.clone(),
            answer: self.answers.get(&rule.depends_on).map(str::to_string),
            condition: rule.condition.clone(),
            operand: rule.value.clone(),
        }
    }
}

/// Converts a stored answer to a number. Empty and non-numeric strings become NaN.
pub(crate) fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(f64::NAN)
}
