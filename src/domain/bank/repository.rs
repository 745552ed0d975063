//! Bank repository trait - the durable record store

use async_trait::async_trait;
use serde::Serialize;

use super::{BankKey, BankRecord};
use crate::domain::question::{Question, QuestionPatch};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Bank entry listed under a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseBank {
    pub bank_key: BankKey,
    pub unit: String,
    pub title: Option<String>,
}

/// Durable store for banks and their questions.
///
/// Banks are unique by `bank_key`; question `external_id`s are unique within
/// a bank. Every write is atomic per call.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BankRepository: Send + Sync {
    /// Create an empty bank, `DuplicateKey` if the key is taken
    async fn create_bank(&self, record: BankRecord) -> Result<BankRecord, DomainError>;

    /// Get a bank record by key
    async fn get_bank(&self, key: &BankKey) -> Result<Option<BankRecord>, DomainError>;

    /// All bank keys, sorted
    async fn list_bank_keys(&self) -> Result<Vec<BankKey>, DomainError>;

    /// Distinct non-empty topics of the first bank matching (course, unit), sorted.
    /// Empty when no bank matches.
    async fn topics_for(&self, course: &str, unit: &str) -> Result<Vec<String>, DomainError>;

    /// Questions of the first bank matching (course, unit), in insertion order.
    /// Empty when no bank matches.
    async fn questions_for(&self, course: &str, unit: &str)
        -> Result<Vec<Question>, DomainError>;

    /// Questions of a bank ordered by external id. Empty when the bank is unknown.
    async fn list_questions(&self, key: &BankKey) -> Result<Vec<Question>, DomainError>;

    /// Add a question to an existing bank
    async fn create_question(
        &self,
        key: &BankKey,
        question: Question,
    ) -> Result<Question, DomainError>;

    /// Patch an existing question
    async fn update_question(
        &self,
        key: &BankKey,
        external_id: &str,
        patch: QuestionPatch,
    ) -> Result<Question, DomainError>;

    /// Remove a question, `NotFound` if absent
    async fn delete_question(&self, key: &BankKey, external_id: &str) -> Result<(), DomainError>;

    /// Create a bank together with all of its questions in one step
    async fn import_bank(
        &self,
        record: BankRecord,
        questions: Vec<Question>,
    ) -> Result<BankKey, DomainError>;

    /// Distinct course names, sorted
    async fn list_courses(&self) -> Result<Vec<String>, DomainError>;

    /// Banks of one course ordered by unit, title and key
    async fn list_course_banks(&self, course: &str) -> Result<Vec<CourseBank>, DomainError>;
}

pub(crate) fn question_not_found(key: &BankKey, external_id: &str) -> DomainError {
    DomainError::not_found(format!(
        "Question '{}' not found in bank '{}'",
        external_id, key
    ))
}

pub(crate) fn bank_not_found(key: &BankKey) -> DomainError {
    DomainError::not_found(format!("Bank '{}' does not exist", key))
}

/// In-memory implementation of BankRepository
pub mod in_memory {
    use super::*;
    use std::collections::HashSet;
    use std::sync::RwLock;

    use crate::domain::bank::distinct_topics;

    #[derive(Debug, Clone)]
    struct StoredBank {
        record: BankRecord,
        questions: Vec<Question>,
    }

    /// Thread-safe in-memory bank store for testing and development.
    ///
    /// Data is lost when the process terminates.
    #[derive(Debug, Default)]
    pub struct InMemoryBankRepository {
        banks: RwLock<Vec<StoredBank>>,
    }

    impl InMemoryBankRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populate a bank with questions (test/dev seeding)
        pub fn with_bank(self, record: BankRecord, questions: Vec<Question>) -> Self {
            if let Ok(mut banks) = self.banks.write() {
                banks.push(StoredBank { record, questions });
            }
            self
        }

        fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<StoredBank>>, DomainError> {
            self.banks
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
        }

        fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<StoredBank>>, DomainError> {
            self.banks
                .write()
                .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
        }
    }

    fn find<'a>(banks: &'a [StoredBank], key: &BankKey) -> Option<&'a StoredBank> {
        banks.iter().find(|b| &b.record.bank_key == key)
    }

    fn find_mut<'a>(banks: &'a mut [StoredBank], key: &BankKey) -> Option<&'a mut StoredBank> {
        banks.iter_mut().find(|b| &b.record.bank_key == key)
    }

    #[async_trait]
    impl BankRepository for InMemoryBankRepository {
        async fn create_bank(&self, record: BankRecord) -> Result<BankRecord, DomainError> {
            let mut banks = self.write()?;

            if find(&banks, &record.bank_key).is_some() {
                return Err(DomainError::duplicate_key(record.bank_key.as_str()));
            }

            banks.push(StoredBank {
                record: record.clone(),
                questions: Vec::new(),
            });
            Ok(record)
        }

        async fn get_bank(&self, key: &BankKey) -> Result<Option<BankRecord>, DomainError> {
            Ok(find(&self.read()?, key).map(|b| b.record.clone()))
        }

        async fn list_bank_keys(&self) -> Result<Vec<BankKey>, DomainError> {
            let mut keys: Vec<BankKey> = self
                .read()?
                .iter()
                .map(|b| b.record.bank_key.clone())
                .collect();
            keys.sort();
            Ok(keys)
        }

        async fn topics_for(&self, course: &str, unit: &str) -> Result<Vec<String>, DomainError> {
            Ok(self
                .read()?
                .iter()
                .find(|b| b.record.course == course && b.record.unit == unit)
                .map(|b| distinct_topics(b.questions.iter().map(Question::topic)))
                .unwrap_or_default())
        }

        async fn questions_for(
            &self,
            course: &str,
            unit: &str,
        ) -> Result<Vec<Question>, DomainError> {
            Ok(self
                .read()?
                .iter()
                .find(|b| b.record.course == course && b.record.unit == unit)
                .map(|b| b.questions.clone())
                .unwrap_or_default())
        }

        async fn list_questions(&self, key: &BankKey) -> Result<Vec<Question>, DomainError> {
            let banks = self.read()?;
            let mut questions = find(&banks, key)
                .map(|b| b.questions.clone())
                .unwrap_or_default();

            questions.sort_by(|a, b| a.external_id().cmp(b.external_id()));
            Ok(questions)
        }

        async fn create_question(
            &self,
            key: &BankKey,
            question: Question,
        ) -> Result<Question, DomainError> {
            let mut banks = self.write()?;
            let bank = find_mut(&mut banks, key).ok_or_else(|| bank_not_found(key))?;

            if bank
                .questions
                .iter()
                .any(|q| q.external_id() == question.external_id())
            {
                return Err(DomainError::duplicate_external_id(
                    key.as_str(),
                    question.external_id(),
                ));
            }

            bank.questions.push(question.clone());
            Ok(question)
        }

        async fn update_question(
            &self,
            key: &BankKey,
            external_id: &str,
            patch: QuestionPatch,
        ) -> Result<Question, DomainError> {
            let mut banks = self.write()?;
            let question = find_mut(&mut banks, key)
                .and_then(|b| b.questions.iter_mut().find(|q| q.external_id() == external_id))
                .ok_or_else(|| question_not_found(key, external_id))?;

            question
                .apply(patch)
                .map_err(|e| DomainError::invalid_request(e.to_string()))?;
            Ok(question.clone())
        }

        async fn delete_question(
            &self,
            key: &BankKey,
            external_id: &str,
        ) -> Result<(), DomainError> {
            let mut banks = self.write()?;
            let bank = find_mut(&mut banks, key)
                .ok_or_else(|| question_not_found(key, external_id))?;

            let before = bank.questions.len();
            bank.questions.retain(|q| q.external_id() != external_id);

            if bank.questions.len() == before {
                return Err(question_not_found(key, external_id));
            }
            Ok(())
        }

        async fn import_bank(
            &self,
            record: BankRecord,
            questions: Vec<Question>,
        ) -> Result<BankKey, DomainError> {
            let mut banks = self.write()?;

            if find(&banks, &record.bank_key).is_some() {
                return Err(DomainError::duplicate_key(record.bank_key.as_str()));
            }

            let mut seen = HashSet::new();
            for question in &questions {
                if !seen.insert(question.external_id()) {
                    return Err(DomainError::duplicate_external_id(
                        record.bank_key.as_str(),
                        question.external_id(),
                    ));
                }
            }

            let key = record.bank_key.clone();
            banks.push(StoredBank { record, questions });
            Ok(key)
        }

        async fn list_courses(&self) -> Result<Vec<String>, DomainError> {
            let mut courses: Vec<String> = self
                .read()?
                .iter()
                .map(|b| b.record.course.clone())
                .filter(|c| !c.is_empty())
                .collect();
            courses.sort();
            courses.dedup();
            Ok(courses)
        }

        async fn list_course_banks(&self, course: &str) -> Result<Vec<CourseBank>, DomainError> {
            let mut banks: Vec<CourseBank> = self
                .read()?
                .iter()
                .filter(|b| b.record.course == course)
                .map(|b| CourseBank {
                    bank_key: b.record.bank_key.clone(),
                    unit: b.record.unit.clone(),
                    title: b.record.title.clone(),
                })
                .collect();

            banks.sort_by(|a, b| {
                (&a.unit, &a.title, &a.bank_key).cmp(&(&b.unit, &b.title, &b.bank_key))
            });
            Ok(banks)
        }
    }
}
