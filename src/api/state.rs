//! Application state for shared services

use std::sync::Arc;

use crate::domain::bank::CourseBank;
use crate::domain::{BankFile, BankKey, BankRecord, DomainError, ExamSpec, Question, QuestionPatch};
use crate::infrastructure::services::{
    BankService, CreateBankRequest, CreateQuestionRequest, ExamPreview, ExamService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub bank_service: Arc<dyn BankServiceTrait>,
    pub exam_service: Arc<dyn ExamServiceTrait>,
}

impl AppState {
    pub fn new(bank_service: BankService, exam_service: ExamService) -> Self {
        Self {
            bank_service: Arc::new(bank_service),
            exam_service: Arc::new(exam_service),
        }
    }
}

/// Trait for record-store operations
#[async_trait::async_trait]
pub trait BankServiceTrait: Send + Sync {
    async fn create_bank(&self, request: CreateBankRequest) -> Result<BankRecord, DomainError>;
    async fn get_bank(&self, bank_key: &str) -> Result<BankRecord, DomainError>;
    async fn list_questions(&self, bank_key: &str) -> Result<Vec<Question>, DomainError>;
    async fn create_question(
        &self,
        bank_key: &str,
        request: CreateQuestionRequest,
    ) -> Result<Question, DomainError>;
    async fn update_question(
        &self,
        bank_key: &str,
        external_id: &str,
        patch: QuestionPatch,
    ) -> Result<Question, DomainError>;
    async fn delete_question(&self, bank_key: &str, external_id: &str) -> Result<(), DomainError>;
    async fn import_bank(&self, file: BankFile, bank_key: &str) -> Result<BankKey, DomainError>;
    async fn list_courses(&self) -> Result<Vec<String>, DomainError>;
    async fn list_course_banks(&self, course: &str) -> Result<Vec<CourseBank>, DomainError>;
}

/// Trait for bank resolution and exam generation
#[async_trait::async_trait]
pub trait ExamServiceTrait: Send + Sync {
    async fn list_banks(&self) -> Result<Vec<BankKey>, DomainError>;
    async fn list_topics(&self, bank_key: &str) -> Result<Vec<String>, DomainError>;
    async fn preview(&self, bank_key: &str, spec: &ExamSpec) -> Result<ExamPreview, DomainError>;
    async fn generate(&self, bank_key: &str, spec: &ExamSpec) -> Result<String, DomainError>;
}

#[async_trait::async_trait]
impl BankServiceTrait for BankService {
    async fn create_bank(&self, request: CreateBankRequest) -> Result<BankRecord, DomainError> {
        BankService::create_bank(self, request).await
    }

    async fn get_bank(&self, bank_key: &str) -> Result<BankRecord, DomainError> {
        BankService::get_bank(self, bank_key).await
    }

    async fn list_questions(&self, bank_key: &str) -> Result<Vec<Question>, DomainError> {
        BankService::list_questions(self, bank_key).await
    }

    async fn create_question(
        &self,
        bank_key: &str,
        request: CreateQuestionRequest,
    ) -> Result<Question, DomainError> {
        BankService::create_question(self, bank_key, request).await
    }

    async fn update_question(
        &self,
        bank_key: &str,
        external_id: &str,
        patch: QuestionPatch,
    ) -> Result<Question, DomainError> {
        BankService::update_question(self, bank_key, external_id, patch).await
    }

    async fn delete_question(&self, bank_key: &str, external_id: &str) -> Result<(), DomainError> {
        BankService::delete_question(self, bank_key, external_id).await
    }

    async fn import_bank(&self, file: BankFile, bank_key: &str) -> Result<BankKey, DomainError> {
        BankService::import_bank(self, file, bank_key).await
    }

    async fn list_courses(&self) -> Result<Vec<String>, DomainError> {
        BankService::list_courses(self).await
    }

    async fn list_course_banks(&self, course: &str) -> Result<Vec<CourseBank>, DomainError> {
        BankService::list_course_banks(self, course).await
    }
}

#[async_trait::async_trait]
impl ExamServiceTrait for ExamService {
    async fn list_banks(&self) -> Result<Vec<BankKey>, DomainError> {
        ExamService::list_banks(self).await
    }

    async fn list_topics(&self, bank_key: &str) -> Result<Vec<String>, DomainError> {
        ExamService::list_topics(self, bank_key).await
    }

    async fn preview(&self, bank_key: &str, spec: &ExamSpec) -> Result<ExamPreview, DomainError> {
        ExamService::preview(self, bank_key, spec).await
    }

    async fn generate(&self, bank_key: &str, spec: &ExamSpec) -> Result<String, DomainError> {
        ExamService::generate(self, bank_key, spec).await
    }
}
