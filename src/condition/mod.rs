//! Visibility rule evaluation.
//!
//! Rules are evaluated directly as structured values. Evaluation is pure and
//! never fails: unknown conditions, missing operands and non-numeric
//! comparisons all produce `false`, which hides the guarded field.
use crate::answers::Answers;
use crate::schema::{Field, Rule};

mod evaluator;
mod trace;

use evaluator::ConditionEngine;
pub use trace::{ConditionTrace, TraceFormatter};

/// Evaluates a rule against the current answers.
pub fn evaluate(rule: &Rule, answers: &Answers) -> bool {
    ConditionEngine::new(answers).evaluate(rule)
}

/// Evaluates a rule and returns a trace that can be formatted for humans.
pub fn explain(rule: &Rule, answers: &Answers) -> ConditionTrace {
    ConditionEngine::new(answers).explain(rule)
}

/// A field without a visibility rule is always visible.
pub fn is_visible(field: &Field, answers: &Answers) -> bool {
    field
        .visibility
        .as_ref()
        .is_none_or(|rule| evaluate(rule, answers))
}
