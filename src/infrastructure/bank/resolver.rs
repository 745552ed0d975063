//! Bank resolution across the durable store and the flat-file store.
//!
//! Flat files anchor a bank's identity (`course`, `unit`); the durable store,
//! when it holds questions for that identity, supplies the question list.
//! Durable-store failures never surface to callers: they are logged and the
//! flat-file answer is used instead.

use std::sync::Arc;

use tracing::{debug, warn};

use super::flat_file::FlatFileBankStore;
use crate::domain::bank::{Bank, BankFile, BankKey, BankRepository};
use crate::domain::{DomainError, Question};

/// Which store answers a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// The durable store returned a non-empty answer
    PreferPrimary,
    /// The durable store was empty or unavailable
    FallbackSecondary,
}

impl ResolutionState {
    /// Durable answers win only when present and non-empty
    pub fn decide<T>(primary: Option<&[T]>) -> Self {
        match primary {
            Some(items) if !items.is_empty() => Self::PreferPrimary,
            _ => Self::FallbackSecondary,
        }
    }
}

/// Combine a durable-store question list with a flat-file bank.
///
/// Identity always comes from the file. Questions come from the durable store
/// when it has any, otherwise from the file, normalized.
pub fn reconcile(
    primary: Option<Vec<Question>>,
    file: &BankFile,
) -> Result<(ResolutionState, Bank), DomainError> {
    let state = ResolutionState::decide(primary.as_deref());

    let questions = match (state, primary) {
        (ResolutionState::PreferPrimary, Some(questions)) => questions,
        _ => file.to_questions().map_err(|(id, e)| {
            DomainError::invalid_format(format!("Invalid question '{}' in bank file: {}", id, e))
        })?,
    };

    Ok((state, Bank::new(&file.course, &file.unit, questions)))
}

/// Read facade over both bank stores
#[derive(Clone)]
pub struct BankResolver {
    repository: Arc<dyn BankRepository>,
    files: FlatFileBankStore,
}

impl std::fmt::Debug for BankResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankResolver")
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

impl BankResolver {
    pub fn new(repository: Arc<dyn BankRepository>, files: FlatFileBankStore) -> Self {
        Self { repository, files }
    }

    /// Materialize the bank addressed by `bank_key`
    pub async fn resolve(&self, bank_key: &str) -> Result<Bank, DomainError> {
        let not_found = || DomainError::not_found(format!("Question bank '{}' not found", bank_key));

        let key = BankKey::new(bank_key).map_err(|_| not_found())?;
        let file = self.files.read(&key).await?.ok_or_else(not_found)?;

        let primary = swallow(
            "questions_for",
            self.repository.questions_for(&file.course, &file.unit).await,
        );

        let (state, bank) = reconcile(primary, &file)?;

        debug!(
            bank_key = %key,
            course = %bank.course(),
            unit = %bank.unit(),
            questions = bank.questions().len(),
            state = ?state,
            "Resolved question bank"
        );

        Ok(bank)
    }

    /// Bank keys from the durable store, or the flat-file directory when it has none
    pub async fn list_banks(&self) -> Result<Vec<BankKey>, DomainError> {
        let primary = swallow("list_bank_keys", self.repository.list_bank_keys().await);

        match (ResolutionState::decide(primary.as_deref()), primary) {
            (ResolutionState::PreferPrimary, Some(keys)) => Ok(keys),
            _ => self.files.list_keys().await,
        }
    }

    /// Topics of a bank, looked up the same way `resolve` finds its questions.
    /// Banks without a flat file have no topics.
    pub async fn list_topics(&self, bank_key: &str) -> Result<Vec<String>, DomainError> {
        let Ok(key) = BankKey::new(bank_key) else {
            return Ok(Vec::new());
        };

        let Some(file) = self.files.read(&key).await? else {
            return Ok(Vec::new());
        };

        let primary = swallow(
            "topics_for",
            self.repository.topics_for(&file.course, &file.unit).await,
        );

        match (ResolutionState::decide(primary.as_deref()), primary) {
            (ResolutionState::PreferPrimary, Some(topics)) => Ok(topics),
            _ => Ok(file.topics()),
        }
    }
}

/// Turn a durable-store failure into "no answer"
fn swallow<T>(operation: &'static str, result: Result<T, DomainError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation, error = %e, "Durable store unavailable, using flat files");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bank::{BankRecord, InMemoryBankRepository, MockBankRepository};

    fn bank_json(course: &str, unit: &str, count: usize) -> String {
        let questions: Vec<String> = (1..=count)
            .map(|i| {
                format!(
                    r#"{{"id": "f{i}", "latex": "\\question file {i}", "topic": "{}"}}"#,
                    if i % 2 == 0 { "graphs" } else { "trees" }
                )
            })
            .collect();

        format!(
            r#"{{"course": "{course}", "unit": "{unit}", "questions": [{}]}}"#,
            questions.join(",")
        )
    }

    fn stored_questions(count: usize) -> Vec<Question> {
        (1..=count)
            .map(|i| {
                Question::new(format!("d{i}"), format!("\\question db {i}"))
                    .unwrap()
                    .with_topic("dynamic")
            })
            .collect()
    }

    fn failing_repository() -> MockBankRepository {
        let mut mock = MockBankRepository::new();
        mock.expect_questions_for()
            .returning(|_, _| Err(DomainError::storage("connection refused")));
        mock.expect_list_bank_keys()
            .returning(|| Err(DomainError::storage("connection refused")));
        mock.expect_topics_for()
            .returning(|_, _| Err(DomainError::storage("connection refused")));
        mock
    }

    #[test]
    fn test_decide() {
        assert_eq!(
            ResolutionState::decide(Some(&[1][..])),
            ResolutionState::PreferPrimary
        );
        assert_eq!(
            ResolutionState::decide::<i32>(Some(&[])),
            ResolutionState::FallbackSecondary
        );
        assert_eq!(
            ResolutionState::decide::<i32>(None),
            ResolutionState::FallbackSecondary
        );
    }

    #[test]
    fn test_reconcile_prefers_durable_questions() {
        let file: BankFile = serde_json::from_str(&bank_json("CS 345", "Unit 1", 5)).unwrap();

        let (state, bank) = reconcile(Some(stored_questions(3)), &file).unwrap();

        assert_eq!(state, ResolutionState::PreferPrimary);
        assert_eq!(bank.course(), "CS 345");
        assert_eq!(bank.questions().len(), 3);
        assert_eq!(bank.questions()[0].external_id(), "d1");
    }

    #[test]
    fn test_reconcile_falls_back_on_empty() {
        let file: BankFile = serde_json::from_str(&bank_json("CS 345", "Unit 1", 5)).unwrap();

        let (state, bank) = reconcile(Some(Vec::new()), &file).unwrap();

        assert_eq!(state, ResolutionState::FallbackSecondary);
        assert_eq!(bank.questions().len(), 5);
        assert_eq!(bank.questions()[0].external_id(), "f1");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_file_when_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit1.json"), bank_json("CS 345", "Unit 1", 4)).unwrap();

        let resolver = BankResolver::new(
            Arc::new(InMemoryBankRepository::new()),
            FlatFileBankStore::new(dir.path()),
        );

        let bank = resolver.resolve("unit1").await.unwrap();
        assert_eq!(bank.unit(), "Unit 1");
        assert_eq!(bank.questions().len(), 4);
    }

    #[tokio::test]
    async fn test_resolve_prefers_store_when_populated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit1.json"), bank_json("CS 345", "Unit 1", 5)).unwrap();

        let record = BankRecord::new(BankKey::new("cs345-u1").unwrap(), "CS 345", "Unit 1", None);
        let repository = InMemoryBankRepository::new().with_bank(record, stored_questions(3));

        let resolver = BankResolver::new(Arc::new(repository), FlatFileBankStore::new(dir.path()));

        let bank = resolver.resolve("unit1.json").await.unwrap();
        assert_eq!(bank.questions().len(), 3);
        assert!(bank.questions().iter().all(|q| q.topic() == Some("dynamic")));
    }

    #[tokio::test]
    async fn test_resolve_missing_bank() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = BankResolver::new(
            Arc::new(InMemoryBankRepository::new()),
            FlatFileBankStore::new(dir.path()),
        );

        let err = resolver.resolve("nonexistent").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = resolver.resolve("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_survives_store_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit1.json"), bank_json("CS 345", "Unit 1", 2)).unwrap();

        let resolver = BankResolver::new(
            Arc::new(failing_repository()),
            FlatFileBankStore::new(dir.path()),
        );

        let bank = resolver.resolve("unit1").await.unwrap();
        assert_eq!(bank.questions().len(), 2);

        let keys = resolver.list_banks().await.unwrap();
        assert_eq!(keys, vec![BankKey::new("unit1").unwrap()]);

        let topics = resolver.list_topics("unit1").await.unwrap();
        assert_eq!(topics, vec!["graphs", "trees"]);
    }

    #[tokio::test]
    async fn test_resolve_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), r#"{"course": "CS 345"}"#).unwrap();
        std::fs::write(
            dir.path().join("blank.json"),
            r#"{"course": "CS 345", "unit": "U", "questions": [{"id": "q1", "latex": ""}]}"#,
        )
        .unwrap();

        let resolver = BankResolver::new(
            Arc::new(InMemoryBankRepository::new()),
            FlatFileBankStore::new(dir.path()),
        );

        for key in ["broken", "blank"] {
            let err = resolver.resolve(key).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidFormat { .. }));
        }
    }

    #[tokio::test]
    async fn test_list_banks_prefers_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file-only.json"), bank_json("CS", "U", 1)).unwrap();

        let record = BankRecord::new(BankKey::new("stored").unwrap(), "CS", "U", None);
        let repository = InMemoryBankRepository::new().with_bank(record, Vec::new());

        let resolver = BankResolver::new(Arc::new(repository), FlatFileBankStore::new(dir.path()));

        let keys = resolver.list_banks().await.unwrap();
        assert_eq!(keys, vec![BankKey::new("stored").unwrap()]);
    }

    #[tokio::test]
    async fn test_list_topics_unknown_bank() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = BankResolver::new(
            Arc::new(InMemoryBankRepository::new()),
            FlatFileBankStore::new(dir.path()),
        );

        assert!(resolver.list_topics("nothing").await.unwrap().is_empty());
        assert!(resolver.list_topics("bad key!").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_topics_matches_resolved_bank() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit1.json"), bank_json("CS 345", "Unit 1", 4)).unwrap();

        let record = BankRecord::new(BankKey::new("cs345_unit1").unwrap(), "CS 345", "Unit 1", None);
        let repository = InMemoryBankRepository::new().with_bank(record, stored_questions(2));

        let resolver = BankResolver::new(Arc::new(repository), FlatFileBankStore::new(dir.path()));

        let topics = resolver.list_topics("unit1").await.unwrap();
        assert_eq!(topics, vec!["dynamic"]);

        let bank = resolver.resolve("unit1").await.unwrap();
        assert_eq!(bank.topics(), topics);
    }

    #[tokio::test]
    async fn test_list_topics_falls_back_to_file_when_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unit1.json"), bank_json("CS 345", "Unit 1", 4)).unwrap();

        let record = BankRecord::new(BankKey::new("cs345_unit1").unwrap(), "CS 345", "Unit 1", None);
        let repository = InMemoryBankRepository::new().with_bank(record, Vec::new());

        let resolver = BankResolver::new(Arc::new(repository), FlatFileBankStore::new(dir.path()));

        assert_eq!(resolver.list_topics("unit1").await.unwrap(), vec!["graphs", "trees"]);
    }

    #[tokio::test]
    async fn test_list_topics_requires_flat_file() {
        let dir = tempfile::tempdir().unwrap();

        let record = BankRecord::new(BankKey::new("stored").unwrap(), "CS 345", "Unit 1", None);
        let repository = InMemoryBankRepository::new().with_bank(record, stored_questions(2));

        let resolver = BankResolver::new(Arc::new(repository), FlatFileBankStore::new(dir.path()));

        assert!(resolver.list_topics("stored").await.unwrap().is_empty());
    }
}
