//! Bank entities: the resolved value object, its durable record and its flat-file payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_bank_key, BankValidationError};
use crate::domain::question::{Question, QuestionValidationError};

/// Bank key - external address of a bank, shared by both stores
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BankKey(String);

impl BankKey {
    const FILE_SUFFIX: &'static str = ".json";

    /// Create a BankKey after validation. A trailing `.json` is stripped so
    /// that a flat-file name and its key address the same bank.
    pub fn new(key: impl Into<String>) -> Result<Self, BankValidationError> {
        let key = key.into();
        let key = key
            .strip_suffix(Self::FILE_SUFFIX)
            .map(str::to_string)
            .unwrap_or(key);

        validate_bank_key(&key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the flat-file representation
    pub fn file_name(&self) -> String {
        format!("{}{}", self.0, Self::FILE_SUFFIX)
    }
}

impl TryFrom<String> for BankKey {
    type Error = BankValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BankKey> for String {
    fn from(key: BankKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for BankKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A materialized question bank, assembled fresh for each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bank {
    course: String,
    unit: String,
    questions: Vec<Question>,
}

impl Bank {
    pub fn new(course: impl Into<String>, unit: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            course: course.into(),
            unit: unit.into(),
            questions,
        }
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Distinct, sorted, non-empty topic labels
    pub fn topics(&self) -> Vec<String> {
        distinct_topics(self.questions.iter().map(Question::topic))
    }
}

/// Collect distinct non-empty topics in sorted order
pub fn distinct_topics<'a>(topics: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut topics: Vec<String> = topics
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    topics.sort();
    topics.dedup();
    topics
}

/// Durable-store row describing a bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankRecord {
    pub bank_key: BankKey,
    pub course: String,
    pub unit: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BankRecord {
    pub fn new(
        bank_key: BankKey,
        course: impl Into<String>,
        unit: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            bank_key,
            course: course.into(),
            unit: unit.into(),
            title,
            created_at: Utc::now(),
        }
    }
}

/// Flat-file bank payload: `{course, unit, title?, questions: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankFile {
    pub course: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<BankFileQuestion>,
}

/// A question entry embedded in a flat-file bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankFileQuestion {
    pub id: String,
    pub latex: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i32>,
}

impl BankFileQuestion {
    /// Normalize into the domain question shape
    pub fn to_question(&self) -> Result<Question, QuestionValidationError> {
        let mut question = Question::new(&self.id, &self.latex)?;

        if let Some(topic) = &self.topic {
            question = question.with_topic(topic);
        }

        if let Some(difficulty) = self.difficulty {
            question = question.with_difficulty(difficulty);
        }

        Ok(question)
    }
}

impl BankFile {
    /// Normalize every embedded question, failing on the first malformed one
    pub fn to_questions(&self) -> Result<Vec<Question>, (String, QuestionValidationError)> {
        self.questions
            .iter()
            .map(|q| q.to_question().map_err(|e| (q.id.clone(), e)))
            .collect()
    }

    /// Distinct, sorted, non-empty topic labels of the embedded questions
    pub fn topics(&self) -> Vec<String> {
        distinct_topics(self.questions.iter().map(|q| q.topic.as_deref()))
    }
}
