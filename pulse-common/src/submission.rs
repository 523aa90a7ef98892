//! Submission validation
//!
//! Validates one submission against the campaign's active survey version:
//! every referenced question must belong to the version, every required and
//! currently-visible question must be answered, and no answer may target a
//! question the submission's own answers rendered hidden.
//!
//! Visibility is evaluated once, from the final submitted answer set: the
//! submission is an atomic snapshot, not an incremental form fill. Any
//! failure rejects the whole submission.

use crate::error::{Error, Result};
use crate::model::Question;
use crate::registry::QuestionRegistry;
use crate::skiplogic::evaluate_visibility;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// One answered question within a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionItem {
    pub question_id: Uuid,
    pub value: Value,
}

/// Validate a submission's items against a survey version's question set.
///
/// Pure function; persistence-side checks (campaign window, duplicate
/// submission) live with the recorder.
pub fn validate_submission(questions: &[Question], items: &[SubmissionItem]) -> Result<()> {
    let registry = QuestionRegistry::new(questions)?;

    let mut answers_by_code: HashMap<String, Value> = HashMap::with_capacity(items.len());
    let mut answered_ids: HashMap<Uuid, ()> = HashMap::with_capacity(items.len());

    for item in items {
        let question = registry
            .by_id(item.question_id)
            .ok_or_else(|| Error::UnknownQuestion(item.question_id.to_string()))?;

        answers_by_code.insert(question.effective_code(), item.value.clone());
        answered_ids.insert(item.question_id, ());
    }

    let visibility = evaluate_visibility(&registry, &answers_by_code);

    for question in registry.ordered() {
        let visible = visibility.get(&question.id).copied().unwrap_or(true);
        if visible && question.required && !answered_ids.contains_key(&question.id) {
            return Err(Error::MissingRequiredAnswer {
                question: question.text.clone(),
            });
        }
    }

    for item in items {
        if visibility.get(&item.question_id) == Some(&false) {
            let text = registry
                .by_id(item.question_id)
                .map(|q| q.text.clone())
                .unwrap_or_else(|| item.question_id.to_string());
            return Err(Error::AnsweredHiddenQuestion { question: text });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionType, VisibilityCondition, VisibilityOperator};
    use serde_json::json;

    /// Q1 (code q1, free text, no conditions) and Q2 (code q2, required,
    /// visible only when q1 EQUALS "yes")
    fn two_question_version() -> Vec<Question> {
        let q1 = Question {
            id: Uuid::new_v4(),
            text: "Do you want to continue?".to_string(),
            code: Some("q1".to_string()),
            question_type: QuestionType::Text,
            required: true,
            order_index: 1,
            validation_rules: None,
            options: vec![],
            visibility_conditions: vec![],
        };
        let q2 = Question {
            id: Uuid::new_v4(),
            text: "Tell us more".to_string(),
            code: Some("q2".to_string()),
            question_type: QuestionType::Text,
            required: true,
            order_index: 2,
            validation_rules: None,
            options: vec![],
            visibility_conditions: vec![VisibilityCondition {
                question_code: "q1".to_string(),
                operator: VisibilityOperator::Equals,
                value: Some(json!("yes")),
            }],
        };
        vec![q1, q2]
    }

    fn item(question_id: Uuid, value: Value) -> SubmissionItem {
        SubmissionItem { question_id, value }
    }

    #[test]
    fn test_hidden_required_question_may_stay_unanswered() {
        let questions = two_question_version();
        let items = vec![item(questions[0].id, json!("no"))];

        assert!(validate_submission(&questions, &items).is_ok());
    }

    #[test]
    fn test_visible_required_question_must_be_answered() {
        let questions = two_question_version();
        let items = vec![item(questions[0].id, json!("yes"))];

        let result = validate_submission(&questions, &items);
        assert!(matches!(
            result,
            Err(Error::MissingRequiredAnswer { question }) if question == "Tell us more"
        ));
    }

    #[test]
    fn test_answer_for_hidden_question_rejected() {
        let questions = two_question_version();
        let items = vec![
            item(questions[0].id, json!("no")),
            item(questions[1].id, json!("anything")),
        ];

        let result = validate_submission(&questions, &items);
        assert!(matches!(result, Err(Error::AnsweredHiddenQuestion { .. })));
    }

    #[test]
    fn test_both_answered_when_visible() {
        let questions = two_question_version();
        let items = vec![
            item(questions[0].id, json!("yes")),
            item(questions[1].id, json!("more detail")),
        ];

        assert!(validate_submission(&questions, &items).is_ok());
    }

    #[test]
    fn test_unknown_question_rejected() {
        let questions = two_question_version();
        let items = vec![item(Uuid::new_v4(), json!("stray"))];

        let result = validate_submission(&questions, &items);
        assert!(matches!(result, Err(Error::UnknownQuestion(_))));
    }

    #[test]
    fn test_optional_hidden_questions_ignored() {
        let mut questions = two_question_version();
        questions[1].required = false;
        let items = vec![item(questions[0].id, json!("no"))];

        assert!(validate_submission(&questions, &items).is_ok());
    }
}
