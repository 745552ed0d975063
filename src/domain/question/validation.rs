//! Question validation

use thiserror::Error;

/// Errors that can occur during question validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuestionValidationError {
    #[error("Question ID cannot be empty")]
    EmptyExternalId,

    #[error("Question ID cannot exceed {0} characters")]
    ExternalIdTooLong(usize),

    #[error("Question LaTeX cannot be empty")]
    EmptyLatex,

    #[error("Question topic cannot be blank")]
    BlankTopic,
}

const MAX_EXTERNAL_ID_LENGTH: usize = 255;

/// Validate a question's bank-scoped identifier
pub fn validate_external_id(id: &str) -> Result<(), QuestionValidationError> {
    if id.trim().is_empty() {
        return Err(QuestionValidationError::EmptyExternalId);
    }

    if id.len() > MAX_EXTERNAL_ID_LENGTH {
        return Err(QuestionValidationError::ExternalIdTooLong(
            MAX_EXTERNAL_ID_LENGTH,
        ));
    }

    Ok(())
}

/// Validate question content. The content itself is opaque; only emptiness is rejected.
pub fn validate_latex(latex: &str) -> Result<(), QuestionValidationError> {
    if latex.trim().is_empty() {
        return Err(QuestionValidationError::EmptyLatex);
    }

    Ok(())
}

pub fn validate_topic(topic: Option<&str>) -> Result<(), QuestionValidationError> {
    match topic {
        Some(t) if t.trim().is_empty() => Err(QuestionValidationError::BlankTopic),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_external_ids() {
        assert!(validate_external_id("q1").is_ok());
        assert!(validate_external_id("alg-001").is_ok());
    }

    #[test]
    fn test_invalid_external_ids() {
        assert_eq!(
            validate_external_id(""),
            Err(QuestionValidationError::EmptyExternalId)
        );
        assert_eq!(
            validate_external_id("   "),
            Err(QuestionValidationError::EmptyExternalId)
        );
        assert_eq!(
            validate_external_id(&"a".repeat(256)),
            Err(QuestionValidationError::ExternalIdTooLong(255))
        );
    }

    #[test]
    fn test_latex_and_topic() {
        assert!(validate_latex(r"\question What is $2+2$?").is_ok());
        assert_eq!(validate_latex(" "), Err(QuestionValidationError::EmptyLatex));

        assert!(validate_topic(None).is_ok());
        assert!(validate_topic(Some("algebra")).is_ok());
        assert_eq!(
            validate_topic(Some("")),
            Err(QuestionValidationError::BlankTopic)
        );
    }
}
