//! Request and response bodies for bank and question endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{BankRecord, Question};
use crate::infrastructure::services::{CreateBankRequest, CreateQuestionRequest};

/// POST /banks
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBankApiRequest {
    pub bank_key: String,
    pub course: String,
    pub unit: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<CreateBankApiRequest> for CreateBankRequest {
    fn from(request: CreateBankApiRequest) -> Self {
        Self {
            bank_key: request.bank_key,
            course: request.course,
            unit: request.unit,
            title: request.title,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BankResponse {
    pub bank_key: String,
    pub course: String,
    pub unit: String,
    pub title: Option<String>,
    pub created_at: String,
}

impl From<&BankRecord> for BankResponse {
    fn from(record: &BankRecord) -> Self {
        Self {
            bank_key: record.bank_key.to_string(),
            course: record.course.clone(),
            unit: record.unit.clone(),
            title: record.title.clone(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// POST /banks/{bank_key}/questions
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionApiRequest {
    pub external_id: String,
    pub latex: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i32>,
}

impl From<CreateQuestionApiRequest> for CreateQuestionRequest {
    fn from(request: CreateQuestionApiRequest) -> Self {
        Self {
            external_id: request.external_id,
            latex: request.latex,
            topic: request.topic,
            difficulty: request.difficulty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub external_id: String,
    pub latex: String,
    pub topic: Option<String>,
    pub difficulty: Option<i32>,
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            external_id: question.external_id().to_string(),
            latex: question.latex().to_string(),
            topic: question.topic().map(String::from),
            difficulty: question.difficulty(),
        }
    }
}

/// POST /banks/import
#[derive(Debug, Clone, Serialize)]
pub struct ImportBankResponse {
    pub bank_key: String,
}

/// DELETE /banks/{bank_key}/questions/{external_id}
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}
