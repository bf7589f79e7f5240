//! The quiz catalog: a fixed, ordered list of questions shared by every session.

use std::{
    fs,
    hash::{Hash, Hasher},
    path::Path,
    sync::Arc,
};

use serde::Deserialize;

use crate::{Error, Result};

/// A quiz question.
///
/// Equality and hashing look at `text` only: two questions with the same prompt
/// are the same question even when their answers differ. The review queue relies
/// on this to collapse duplicate prompts into one entry.
#[derive(Clone, Debug, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(rename = "answer")]
    pub correct_answer: String,
}

impl Question {
    pub fn new(text: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            correct_answer: correct_answer.into(),
        }
    }

    /// Case-insensitive comparison against the correct answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.to_lowercase() == self.correct_answer.to_lowercase()
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Question {}

impl Hash for Question {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

/// Immutable ordered question list. Clones share the same allocation.
#[derive(Clone, Debug)]
pub struct QuizCatalog {
    questions: Arc<[Question]>,
}

impl QuizCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::Catalog("quiz catalog is empty".to_string()));
        }
        Ok(Self {
            questions: questions.into(),
        })
    }

    /// Load a catalog from a JSON array of `{"text": ..., "answer": ...}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Catalog(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for QuizCatalog {
    fn default() -> Self {
        Self {
            questions: vec![
                Question::new("Calculate the power: 10^2", "100"),
                Question::new("What is 2 + 2 * 2", "6"),
            ]
            .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn questions_compare_by_text_only() {
        let a = Question::new("10^2", "100");
        let b = Question::new("10^2", "one hundred");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);

        assert_ne!(Question::new("10^2", "100"), Question::new("10^3", "100"));
    }

    #[test]
    fn answers_are_case_insensitive() {
        let q = Question::new("Capital of France?", "Paris");
        assert!(q.is_correct("paris"));
        assert!(q.is_correct("PARIS"));
        assert!(!q.is_correct("paris "));
        assert!(!q.is_correct("Lyon"));
    }

    #[test]
    fn parses_json_catalog_in_order() {
        let cat = QuizCatalog::from_json_str(
            r#"[{"text": "1+1", "answer": "2"}, {"text": "2+3", "answer": "5"}]"#,
        )
        .unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.get(0).unwrap().text, "1+1");
        assert_eq!(cat.get(1).unwrap().correct_answer, "5");
        assert!(cat.get(2).is_none());
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            QuizCatalog::from_json_str("[]"),
            Err(Error::Catalog(_))
        ));
        assert!(matches!(
            QuizCatalog::from_json_str("{"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn default_catalog_has_two_questions() {
        let cat = QuizCatalog::default();
        assert_eq!(cat.len(), 2);
        assert!(!cat.is_empty());
        assert_eq!(cat.get(0).unwrap().correct_answer, "100");
        assert_eq!(cat.get(1).unwrap().correct_answer, "6");
    }
}
