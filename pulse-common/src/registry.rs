//! Question registry
//!
//! Lookup structure over one survey version's question list: questions in
//! ascending order-index order plus maps by id and by effective code.
//! Pure data holder; construction enforces the unique-code invariant.

use crate::error::{Error, Result};
use crate::model::Question;
use std::collections::HashMap;
use uuid::Uuid;

/// Order-indexed view of a survey version's questions
#[derive(Debug)]
pub struct QuestionRegistry<'a> {
    ordered: Vec<&'a Question>,
    by_id: HashMap<Uuid, &'a Question>,
    by_code: HashMap<String, &'a Question>,
}

impl<'a> QuestionRegistry<'a> {
    /// Build the registry. Fails with `DuplicateQuestionCode` if two
    /// questions in the version share an effective code.
    pub fn new(questions: &'a [Question]) -> Result<Self> {
        let mut ordered: Vec<&Question> = questions.iter().collect();
        ordered.sort_by_key(|q| q.order_index);

        let mut by_id = HashMap::with_capacity(ordered.len());
        let mut by_code = HashMap::with_capacity(ordered.len());

        for question in &ordered {
            by_id.insert(question.id, *question);
            if by_code.insert(question.effective_code(), *question).is_some() {
                return Err(Error::DuplicateQuestionCode(question.effective_code()));
            }
        }

        Ok(Self {
            ordered,
            by_id,
            by_code,
        })
    }

    /// Questions in ascending order-index order
    pub fn ordered(&self) -> &[&'a Question] {
        &self.ordered
    }

    pub fn by_id(&self, id: Uuid) -> Option<&'a Question> {
        self.by_id.get(&id).copied()
    }

    pub fn by_code(&self, code: &str) -> Option<&'a Question> {
        self.by_code.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionType;

    fn question(code: Option<&str>, order_index: i64) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: format!("Question {}", order_index),
            code: code.map(String::from),
            question_type: QuestionType::Text,
            required: false,
            order_index,
            validation_rules: None,
            options: vec![],
            visibility_conditions: vec![],
        }
    }

    #[test]
    fn test_registry_orders_by_index() {
        let questions = vec![
            question(Some("q3"), 3),
            question(Some("q1"), 1),
            question(Some("q2"), 2),
        ];

        let registry = QuestionRegistry::new(&questions).unwrap();
        let codes: Vec<String> = registry
            .ordered()
            .iter()
            .map(|q| q.effective_code())
            .collect();
        assert_eq!(codes, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_registry_lookup_by_id_and_code() {
        let questions = vec![question(Some("q1"), 1), question(None, 2)];
        let registry = QuestionRegistry::new(&questions).unwrap();

        assert!(registry.by_code("q1").is_some());
        // A question without a code is keyed by its id string
        let uncoded = &questions[1];
        assert_eq!(
            registry.by_code(&uncoded.id.to_string()).map(|q| q.id),
            Some(uncoded.id)
        );
        assert_eq!(registry.by_id(uncoded.id).map(|q| q.id), Some(uncoded.id));
    }

    #[test]
    fn test_registry_rejects_duplicate_codes() {
        let questions = vec![question(Some("dup"), 1), question(Some("dup"), 2)];
        let result = QuestionRegistry::new(&questions);
        assert!(matches!(result, Err(Error::DuplicateQuestionCode(code)) if code == "dup"));
    }
}
