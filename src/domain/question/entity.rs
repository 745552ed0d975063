//! Question entity

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_external_id, validate_latex, validate_topic, QuestionValidationError,
};

/// A pre-authored exam question.
///
/// The `latex` payload is opaque: it is carried through selection and
/// rendering untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    external_id: String,
    latex: String,
    topic: Option<String>,
    difficulty: Option<i32>,
}

impl Question {
    /// Create a question without topic or difficulty
    pub fn new(
        external_id: impl Into<String>,
        latex: impl Into<String>,
    ) -> Result<Self, QuestionValidationError> {
        let external_id = external_id.into();
        let latex = latex.into();

        validate_external_id(&external_id)?;
        validate_latex(&latex)?;

        Ok(Self {
            external_id,
            latex,
            topic: None,
            difficulty: None,
        })
    }

    /// Builder: set the topic label
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Builder: set the difficulty ordinal
    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Reassemble a question from already-persisted fields.
    ///
    /// Stored records were validated on the way in, so no checks run here.
    pub fn from_parts(
        external_id: String,
        latex: String,
        topic: Option<String>,
        difficulty: Option<i32>,
    ) -> Self {
        Self {
            external_id,
            latex,
            topic,
            difficulty,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn latex(&self) -> &str {
        &self.latex
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn difficulty(&self) -> Option<i32> {
        self.difficulty
    }

    /// Apply a partial update; absent fields keep their current value
    pub fn apply(&mut self, patch: QuestionPatch) -> Result<(), QuestionValidationError> {
        if let Some(latex) = patch.latex.as_deref() {
            validate_latex(latex)?;
        }
        validate_topic(patch.topic.as_deref())?;

        if let Some(latex) = patch.latex {
            self.latex = latex;
        }

        if let Some(topic) = patch.topic {
            self.topic = Some(topic);
        }

        if let Some(difficulty) = patch.difficulty {
            self.difficulty = Some(difficulty);
        }

        Ok(())
    }
}

/// Partial update for a stored question
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionPatch {
    pub latex: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<i32>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.latex.is_none() && self.topic.is_none() && self.difficulty.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_builder() {
        let question = Question::new("q1", r"\question $x^2$")
            .unwrap()
            .with_topic("algebra")
            .with_difficulty(2);

        assert_eq!(question.external_id(), "q1");
        assert_eq!(question.latex(), r"\question $x^2$");
        assert_eq!(question.topic(), Some("algebra"));
        assert_eq!(question.difficulty(), Some(2));
    }

    #[test]
    fn test_question_rejects_empty_fields() {
        assert_eq!(
            Question::new("", "x"),
            Err(QuestionValidationError::EmptyExternalId)
        );
        assert_eq!(
            Question::new("q1", ""),
            Err(QuestionValidationError::EmptyLatex)
        );
    }

    #[test]
    fn test_apply_patch_keeps_missing_fields() {
        let mut question = Question::new("q1", "old").unwrap().with_topic("algebra");

        question
            .apply(QuestionPatch {
                latex: Some("new".to_string()),
                topic: None,
                difficulty: Some(3),
            })
            .unwrap();

        assert_eq!(question.latex(), "new");
        assert_eq!(question.topic(), Some("algebra"));
        assert_eq!(question.difficulty(), Some(3));
    }

    #[test]
    fn test_apply_patch_rejects_blank_topic() {
        let mut question = Question::new("q1", "x").unwrap();
        let result = question.apply(QuestionPatch {
            topic: Some(" ".to_string()),
            ..Default::default()
        });

        assert_eq!(result, Err(QuestionValidationError::BlankTopic));
        assert_eq!(question.topic(), None);
    }

    #[test]
    fn test_empty_patch() {
        assert!(QuestionPatch::default().is_empty());
    }
}
