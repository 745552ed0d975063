//! Exam service - resolve a bank, sample it and render the exam document

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::sampler::select_for_spec;
use crate::domain::{BankKey, DomainError, ExamSpec, ExamTemplate, Question};
use crate::infrastructure::bank::BankResolver;

/// Selected questions with the identity of their bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamPreview {
    pub course: String,
    pub unit: String,
    pub questions: Vec<Question>,
}

/// Exam service: the resolve → select → render pipeline
#[derive(Debug, Clone)]
pub struct ExamService {
    resolver: BankResolver,
    template: ExamTemplate,
}

impl ExamService {
    pub fn new(resolver: BankResolver, template: ExamTemplate) -> Self {
        Self { resolver, template }
    }

    /// Load the exam template from `path`, or use the built-in one
    pub async fn load_template(path: Option<&Path>) -> Result<ExamTemplate, DomainError> {
        let Some(path) = path else {
            return Ok(ExamTemplate::default());
        };

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "LaTeX template '{}' could not be read: {}",
                path.display(),
                e
            ))
        })?;

        Ok(ExamTemplate::new(content))
    }

    pub async fn list_banks(&self) -> Result<Vec<BankKey>, DomainError> {
        self.resolver.list_banks().await
    }

    pub async fn list_topics(&self, bank_key: &str) -> Result<Vec<String>, DomainError> {
        self.resolver.list_topics(bank_key).await
    }

    /// Resolve the bank and select questions for `spec`
    pub async fn preview(&self, bank_key: &str, spec: &ExamSpec) -> Result<ExamPreview, DomainError> {
        let bank = self.resolver.resolve(bank_key).await?;
        let questions = select_for_spec(bank.questions(), spec)?;

        info!(
            bank_key,
            total = spec.total,
            seeded = spec.seed.is_some(),
            "Selected exam questions"
        );

        Ok(ExamPreview {
            course: bank.course().to_string(),
            unit: bank.unit().to_string(),
            questions,
        })
    }

    /// Resolve, select and render the full LaTeX document
    pub async fn generate(&self, bank_key: &str, spec: &ExamSpec) -> Result<String, DomainError> {
        let preview = self.preview(bank_key, spec).await?;

        Ok(self
            .template
            .render(&preview.course, &preview.unit, &preview.questions))
    }
}
