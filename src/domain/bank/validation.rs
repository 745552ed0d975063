//! Bank validation

use thiserror::Error;

/// Errors that can occur during bank validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BankValidationError {
    #[error("Bank key cannot be empty")]
    EmptyKey,

    #[error("Bank key cannot exceed {0} characters")]
    KeyTooLong(usize),

    #[error("Bank key can only contain alphanumeric characters, hyphens, underscores and dots")]
    InvalidKeyCharacters,

    #[error("Bank key cannot start with a dot")]
    InvalidKeyFormat,

    #[error("Course cannot be empty")]
    EmptyCourse,

    #[error("Unit cannot be empty")]
    EmptyUnit,
}

const MAX_BANK_KEY_LENGTH: usize = 100;

/// Validate a bank key. Keys double as flat-file stems, so path separators are rejected.
pub fn validate_bank_key(key: &str) -> Result<(), BankValidationError> {
    if key.is_empty() {
        return Err(BankValidationError::EmptyKey);
    }

    if key.len() > MAX_BANK_KEY_LENGTH {
        return Err(BankValidationError::KeyTooLong(MAX_BANK_KEY_LENGTH));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(BankValidationError::InvalidKeyCharacters);
    }

    if key.starts_with('.') {
        return Err(BankValidationError::InvalidKeyFormat);
    }

    Ok(())
}

/// Validate the (course, unit) identity of a bank
pub fn validate_bank_identity(course: &str, unit: &str) -> Result<(), BankValidationError> {
    if course.trim().is_empty() {
        return Err(BankValidationError::EmptyCourse);
    }

    if unit.trim().is_empty() {
        return Err(BankValidationError::EmptyUnit);
    }

    Ok(())
}
