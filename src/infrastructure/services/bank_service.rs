//! Bank service - catalog reads and record-store writes for banks and questions

use std::sync::Arc;

use tracing::info;

use crate::domain::bank::{validate_bank_identity, CourseBank};
use crate::domain::question::{validate_latex, validate_topic};
use crate::domain::{
    BankFile, BankKey, BankRecord, BankRepository, DomainError, Question, QuestionPatch,
};

/// Request to create an empty bank
#[derive(Debug, Clone)]
pub struct CreateBankRequest {
    pub bank_key: String,
    pub course: String,
    pub unit: String,
    pub title: Option<String>,
}

/// Request to add a question to a bank
#[derive(Debug, Clone)]
pub struct CreateQuestionRequest {
    pub external_id: String,
    pub latex: String,
    pub topic: Option<String>,
    pub difficulty: Option<i32>,
}

/// Bank service for record-store operations
#[derive(Clone)]
pub struct BankService {
    repository: Arc<dyn BankRepository>,
}

impl std::fmt::Debug for BankService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankService").finish_non_exhaustive()
    }
}

impl BankService {
    pub fn new(repository: Arc<dyn BankRepository>) -> Self {
        Self { repository }
    }

    /// Create an empty bank
    pub async fn create_bank(&self, request: CreateBankRequest) -> Result<BankRecord, DomainError> {
        let bank_key = parse_bank_key(&request.bank_key)?;

        validate_bank_identity(&request.course, &request.unit)
            .map_err(|e| DomainError::invalid_request(e.to_string()))?;

        let record = BankRecord::new(
            bank_key,
            request.course.trim(),
            request.unit.trim(),
            normalize_title(request.title),
        );

        let record = self.repository.create_bank(record).await?;
        info!(bank_key = %record.bank_key, course = %record.course, unit = %record.unit, "Created bank");

        Ok(record)
    }

    /// Get a bank record, returning an error if not found
    pub async fn get_bank(&self, bank_key: &str) -> Result<BankRecord, DomainError> {
        let key = parse_bank_key(bank_key)?;

        self.repository
            .get_bank(&key)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Bank '{}' not found", bank_key)))
    }

    /// Questions of a bank ordered by external id; empty for an unknown bank
    pub async fn list_questions(&self, bank_key: &str) -> Result<Vec<Question>, DomainError> {
        let key = parse_bank_key(bank_key)?;
        self.repository.list_questions(&key).await
    }

    pub async fn create_question(
        &self,
        bank_key: &str,
        request: CreateQuestionRequest,
    ) -> Result<Question, DomainError> {
        let key = parse_bank_key(bank_key)?;

        validate_topic(request.topic.as_deref())
            .map_err(|e| DomainError::invalid_request(e.to_string()))?;

        let mut question = Question::new(request.external_id, request.latex)
            .map_err(|e| DomainError::invalid_request(e.to_string()))?;

        if let Some(topic) = request.topic {
            question = question.with_topic(topic);
        }

        if let Some(difficulty) = request.difficulty {
            question = question.with_difficulty(difficulty);
        }

        let question = self.repository.create_question(&key, question).await?;
        info!(bank_key = %key, external_id = %question.external_id(), "Created question");

        Ok(question)
    }

    pub async fn update_question(
        &self,
        bank_key: &str,
        external_id: &str,
        patch: QuestionPatch,
    ) -> Result<Question, DomainError> {
        let key = parse_bank_key(bank_key)?;

        if let Some(latex) = patch.latex.as_deref() {
            validate_latex(latex).map_err(|e| DomainError::invalid_request(e.to_string()))?;
        }
        validate_topic(patch.topic.as_deref())
            .map_err(|e| DomainError::invalid_request(e.to_string()))?;

        let question = self
            .repository
            .update_question(&key, external_id, patch)
            .await?;
        info!(bank_key = %key, external_id, "Updated question");

        Ok(question)
    }

    pub async fn delete_question(&self, bank_key: &str, external_id: &str) -> Result<(), DomainError> {
        let key = parse_bank_key(bank_key)?;

        self.repository.delete_question(&key, external_id).await?;
        info!(bank_key = %key, external_id, "Deleted question");

        Ok(())
    }

    /// Import a parsed bank file under `bank_key`, all or nothing
    pub async fn import_bank(&self, file: BankFile, bank_key: &str) -> Result<BankKey, DomainError> {
        let key = parse_bank_key(bank_key)?;

        validate_bank_identity(&file.course, &file.unit)
            .map_err(|e| DomainError::invalid_format(e.to_string()))?;

        let questions = file.to_questions().map_err(|(id, e)| {
            DomainError::invalid_format(format!("Invalid question '{}': {}", id, e))
        })?;

        let count = questions.len();
        let record = BankRecord::new(key, file.course, file.unit, normalize_title(file.title));

        let key = self.repository.import_bank(record, questions).await?;
        info!(bank_key = %key, questions = count, "Imported bank");

        Ok(key)
    }

    pub async fn list_courses(&self) -> Result<Vec<String>, DomainError> {
        self.repository.list_courses().await
    }

    pub async fn list_course_banks(&self, course: &str) -> Result<Vec<CourseBank>, DomainError> {
        self.repository.list_course_banks(course).await
    }
}

fn parse_bank_key(raw: &str) -> Result<BankKey, DomainError> {
    BankKey::new(raw).map_err(|e| DomainError::invalid_request(e.to_string()))
}

fn normalize_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
