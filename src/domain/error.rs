use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Bank '{bank_key}' already exists")]
    DuplicateKey { bank_key: String },

    #[error("Question '{external_id}' already exists in bank '{bank_key}'")]
    DuplicateExternalId {
        bank_key: String,
        external_id: String,
    },

    #[error("Internal invariant violated: {message}")]
    InternalInvariant { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn duplicate_key(bank_key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            bank_key: bank_key.into(),
        }
    }

    pub fn duplicate_external_id(
        bank_key: impl Into<String>,
        external_id: impl Into<String>,
    ) -> Self {
        Self::DuplicateExternalId {
            bank_key: bank_key.into(),
            external_id: external_id.into(),
        }
    }

    pub fn internal_invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariant {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Human-readable reason without the variant prefix
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidRequest { message }
            | Self::NotFound { message }
            | Self::InvalidFormat { message }
            | Self::InternalInvariant { message }
            | Self::Storage { message }
            | Self::Configuration { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_error() {
        let error = DomainError::invalid_request("total must be positive");
        assert_eq!(error.to_string(), "Invalid request: total must be positive");
        assert_eq!(error.reason(), "total must be positive");
    }

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Bank 'unit-1' not found");
        assert_eq!(error.to_string(), "Not found: Bank 'unit-1' not found");
    }

    #[test]
    fn test_duplicate_errors() {
        let error = DomainError::duplicate_key("cs345-unit1");
        assert_eq!(error.to_string(), "Bank 'cs345-unit1' already exists");

        let error = DomainError::duplicate_external_id("cs345-unit1", "q1");
        assert_eq!(
            error.to_string(),
            "Question 'q1' already exists in bank 'cs345-unit1'"
        );
        assert_eq!(error.reason(), error.to_string());
    }
}
