//! Request and response bodies for exam generation

use serde::{Deserialize, Serialize};

use crate::domain::{ExamSpec, Question, TopicWeights};
use crate::infrastructure::services::ExamPreview;

/// `?bank_file=` query of the generation endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct BankFileQuery {
    pub bank_file: String,
}

/// Exam request body; `topic_weights` keeps the client's key order
#[derive(Debug, Clone, Deserialize)]
pub struct ExamRequest {
    pub total_questions: i64,
    pub topic_weights: TopicWeights,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl From<ExamRequest> for ExamSpec {
    fn from(request: ExamRequest) -> Self {
        Self {
            total: request.total_questions,
            weights: request.topic_weights,
            seed: request.seed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewQuestion {
    pub id: String,
    pub topic: Option<String>,
    pub latex: String,
}

impl From<&Question> for PreviewQuestion {
    fn from(question: &Question) -> Self {
        Self {
            id: question.external_id().to_string(),
            topic: question.topic().map(String::from),
            latex: question.latex().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub course: String,
    pub unit: String,
    pub questions: Vec<PreviewQuestion>,
}

impl From<ExamPreview> for PreviewResponse {
    fn from(preview: ExamPreview) -> Self {
        Self {
            questions: preview.questions.iter().map(PreviewQuestion::from).collect(),
            course: preview.course,
            unit: preview.unit,
        }
    }
}
