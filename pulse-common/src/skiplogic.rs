//! Skip logic: authoring-time validation and submission-time evaluation
//!
//! A question's visibility is the AND of its conditions; a question with no
//! conditions is always visible. Conditions may only reference questions at
//! a strictly smaller order index, which makes cycles structurally
//! impossible. Validation is a single ordered pass, no graph traversal.
//!
//! Evaluation proceeds in ascending order-index order against the answers
//! reported by one submission, keyed by question code. Because every
//! reference points strictly backwards, the answer map is complete for every
//! code before it is consulted; no fixpoint pass is needed.

use crate::error::{Error, Result};
use crate::model::{Question, VisibilityCondition, VisibilityOperator};
use crate::registry::QuestionRegistry;
use crate::value::{compare_order, display_string, is_empty_value};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Validate the skip logic of one survey version's question set.
///
/// Runs once at survey-version or template authoring time; never re-run at
/// submission time. Rejects references to unknown codes and references to
/// questions at the same or a later order index (self-references included).
/// Does not mutate its input.
pub fn validate_skip_logic(questions: &[Question]) -> Result<()> {
    let registry = QuestionRegistry::new(questions)?;

    let order_by_code: HashMap<String, i64> = registry
        .ordered()
        .iter()
        .map(|q| (q.effective_code(), q.order_index))
        .collect();

    for question in registry.ordered() {
        for condition in &question.visibility_conditions {
            let referenced_order = match order_by_code.get(&condition.question_code) {
                Some(order) => *order,
                None => {
                    return Err(Error::UnknownReference {
                        question: question.text.clone(),
                        code: condition.question_code.clone(),
                    })
                }
            };

            if referenced_order >= question.order_index {
                return Err(Error::ForwardReference {
                    question: question.text.clone(),
                    code: condition.question_code.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Compute per-question visibility from one submission's answers.
///
/// `answers_by_code` maps each answered question's code to the reported
/// value. Output covers every question in the registry, answered or not.
/// Pure function of its inputs.
pub fn evaluate_visibility(
    registry: &QuestionRegistry,
    answers_by_code: &HashMap<String, Value>,
) -> HashMap<Uuid, bool> {
    let mut visibility = HashMap::with_capacity(registry.len());

    for question in registry.ordered() {
        let visible = question
            .visibility_conditions
            .iter()
            .all(|condition| evaluate_condition(condition, answers_by_code));
        visibility.insert(question.id, visible);
    }

    visibility
}

/// Evaluate a single condition against the reported answers.
///
/// A missing answer behaves like an absent value: it never EQUALS anything,
/// fails every ordering comparison, and counts as empty.
fn evaluate_condition(
    condition: &VisibilityCondition,
    answers_by_code: &HashMap<String, Value>,
) -> bool {
    let actual = answers_by_code.get(&condition.question_code);
    let expected = condition.value.as_ref();

    match condition.operator {
        VisibilityOperator::Equals => match (actual, expected) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        },
        VisibilityOperator::NotEquals => match (actual, expected) {
            (Some(a), Some(b)) => a != b,
            (None, None) => false,
            _ => true,
        },
        VisibilityOperator::In => in_set(actual, expected),
        VisibilityOperator::NotIn => !in_set(actual, expected),
        VisibilityOperator::GreaterThan => {
            ordering_holds(actual, expected, |o| o == Ordering::Greater)
        }
        VisibilityOperator::GreaterOrEqual => {
            ordering_holds(actual, expected, |o| o != Ordering::Less)
        }
        VisibilityOperator::LessThan => ordering_holds(actual, expected, |o| o == Ordering::Less),
        VisibilityOperator::LessOrEqual => {
            ordering_holds(actual, expected, |o| o != Ordering::Greater)
        }
        VisibilityOperator::Contains => contains(actual, expected),
        VisibilityOperator::NotContains => !contains(actual, expected),
        VisibilityOperator::IsEmpty => actual.map_or(true, is_empty_value),
        VisibilityOperator::IsNotEmpty => !actual.map_or(true, is_empty_value),
    }
}

/// IN membership: the condition value must be an array; anything else makes
/// IN false (and NOT_IN true, via negation at the call site).
fn in_set(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    let Some(Value::Array(set)) = expected else {
        return false;
    };
    let Some(actual) = actual else {
        return false;
    };
    set.contains(actual)
}

fn ordering_holds(
    actual: Option<&Value>,
    expected: Option<&Value>,
    pred: impl Fn(Ordering) -> bool,
) -> bool {
    match (actual, expected) {
        (Some(a), Some(b)) => compare_order(a, b).map_or(false, pred),
        _ => false,
    }
}

/// CONTAINS: element membership for array answers, substring containment of
/// the stringified condition value for text answers, false otherwise.
fn contains(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match actual {
        Some(Value::Array(items)) => match expected {
            Some(needle) => items.contains(needle),
            None => false,
        },
        Some(Value::String(text)) => {
            let needle = expected.map(display_string).unwrap_or_default();
            text.contains(&needle)
        }
        _ => false,
    }
}
