//! PostgreSQL bank repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::bank::{BankKey, BankRecord, BankRepository, CourseBank};
use crate::domain::question::{validate_latex, validate_topic, Question, QuestionPatch};
use crate::domain::DomainError;

/// PostgreSQL implementation of BankRepository.
///
/// Reads borrow a pooled connection per query; writes run in one transaction.
#[derive(Debug, Clone)]
pub struct PostgresBankRepository {
    pool: PgPool,
}

impl PostgresBankRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn commit_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to commit transaction: {}", e))
}

#[async_trait]
impl BankRepository for PostgresBankRepository {
    async fn create_bank(&self, record: BankRecord) -> Result<BankRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO question_banks (bank_key, course, unit, title, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.bank_key.as_str())
        .bind(&record.course)
        .bind(&record.unit)
        .bind(&record.title)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_key(record.bank_key.as_str())
            } else {
                DomainError::storage(format!("Failed to create bank: {}", e))
            }
        })?;

        Ok(record)
    }

    async fn get_bank(&self, key: &BankKey) -> Result<Option<BankRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT bank_key, course, unit, title, created_at
            FROM question_banks
            WHERE bank_key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get bank: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list_bank_keys(&self) -> Result<Vec<BankKey>, DomainError> {
        let keys: Vec<String> =
            sqlx::query_scalar("SELECT bank_key FROM question_banks ORDER BY bank_key")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to list banks: {}", e)))?;

        keys.into_iter().map(|k| parse_key(&k)).collect()
    }

    async fn topics_for(&self, course: &str, unit: &str) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT topic
            FROM questions
            WHERE bank_id = (
                SELECT id FROM question_banks
                WHERE course = $1 AND unit = $2
                ORDER BY id
                LIMIT 1
            )
            AND topic IS NOT NULL AND topic <> ''
            ORDER BY topic
            "#,
        )
        .bind(course)
        .bind(unit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list topics: {}", e)))
    }

    async fn questions_for(
        &self,
        course: &str,
        unit: &str,
    ) -> Result<Vec<Question>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT external_id, latex, topic, difficulty
            FROM questions
            WHERE bank_id = (
                SELECT id FROM question_banks
                WHERE course = $1 AND unit = $2
                ORDER BY id
                LIMIT 1
            )
            ORDER BY id
            "#,
        )
        .bind(course)
        .bind(unit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load questions: {}", e)))?;

        rows.iter().map(row_to_question).collect()
    }

    async fn list_questions(&self, key: &BankKey) -> Result<Vec<Question>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT q.external_id, q.latex, q.topic, q.difficulty
            FROM questions q
            JOIN question_banks b ON b.id = q.bank_id
            WHERE b.bank_key = $1
            ORDER BY q.external_id
            "#,
        )
        .bind(key.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list questions: {}", e)))?;

        rows.iter().map(row_to_question).collect()
    }

    async fn create_question(
        &self,
        key: &BankKey,
        question: Question,
    ) -> Result<Question, DomainError> {
        let mut tx = self.begin().await?;

        let bank_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM question_banks WHERE bank_key = $1")
                .bind(key.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to look up bank: {}", e)))?;

        let bank_id = bank_id.ok_or_else(|| {
            DomainError::not_found(format!("Bank '{}' does not exist", key))
        })?;

        insert_question(&mut tx, key, bank_id, &question).await?;
        tx.commit().await.map_err(commit_error)?;

        Ok(question)
    }

    async fn update_question(
        &self,
        key: &BankKey,
        external_id: &str,
        patch: QuestionPatch,
    ) -> Result<Question, DomainError> {
        if let Some(latex) = patch.latex.as_deref() {
            validate_latex(latex).map_err(|e| DomainError::invalid_request(e.to_string()))?;
        }
        validate_topic(patch.topic.as_deref())
            .map_err(|e| DomainError::invalid_request(e.to_string()))?;

        let row = sqlx::query(
            r#"
            UPDATE questions q
            SET latex = COALESCE($3, q.latex),
                topic = COALESCE($4, q.topic),
                difficulty = COALESCE($5, q.difficulty)
            FROM question_banks b
            WHERE b.id = q.bank_id AND b.bank_key = $1 AND q.external_id = $2
            RETURNING q.external_id, q.latex, q.topic, q.difficulty
            "#,
        )
        .bind(key.as_str())
        .bind(external_id)
        .bind(patch.latex)
        .bind(patch.topic)
        .bind(patch.difficulty)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update question: {}", e)))?;

        match row {
            Some(row) => row_to_question(&row),
            None => Err(DomainError::not_found(format!(
                "Question '{}' not found in bank '{}'",
                external_id, key
            ))),
        }
    }

    async fn delete_question(&self, key: &BankKey, external_id: &str) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM questions q
            USING question_banks b
            WHERE b.id = q.bank_id AND b.bank_key = $1 AND q.external_id = $2
            "#,
        )
        .bind(key.as_str())
        .bind(external_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to delete question: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Question '{}' not found in bank '{}'",
                external_id, key
            )));
        }

        Ok(())
    }

    async fn import_bank(
        &self,
        record: BankRecord,
        questions: Vec<Question>,
    ) -> Result<BankKey, DomainError> {
        let mut tx = self.begin().await?;

        let bank_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO question_banks (bank_key, course, unit, title, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(record.bank_key.as_str())
        .bind(&record.course)
        .bind(&record.unit)
        .bind(&record.title)
        .bind(record.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_key(record.bank_key.as_str())
            } else {
                DomainError::storage(format!("Failed to import bank: {}", e))
            }
        })?;

        for question in &questions {
            insert_question(&mut tx, &record.bank_key, bank_id, question).await?;
        }

        tx.commit().await.map_err(commit_error)?;

        Ok(record.bank_key)
    }

    async fn list_courses(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar(
            "SELECT DISTINCT course FROM question_banks WHERE course <> '' ORDER BY course",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list courses: {}", e)))
    }

    async fn list_course_banks(&self, course: &str) -> Result<Vec<CourseBank>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT bank_key, unit, title
            FROM question_banks
            WHERE course = $1
            ORDER BY unit, title NULLS FIRST, bank_key
            "#,
        )
        .bind(course)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list course banks: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<CourseBank, DomainError> {
                Ok(CourseBank {
                    bank_key: parse_key(&get::<String>(row, "bank_key")?)?,
                    unit: get(row, "unit")?,
                    title: get(row, "title")?,
                })
            })
            .collect()
    }
}

async fn insert_question(
    tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
    key: &BankKey,
    bank_id: i64,
    question: &Question,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO questions (bank_id, external_id, latex, topic, difficulty)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(bank_id)
    .bind(question.external_id())
    .bind(question.latex())
    .bind(question.topic())
    .bind(question.difficulty())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            DomainError::duplicate_external_id(key.as_str(), question.external_id())
        } else {
            DomainError::storage(format!("Failed to create question: {}", e))
        }
    })?;

    Ok(())
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", column, e)))
}

fn parse_key(raw: &str) -> Result<BankKey, DomainError> {
    BankKey::new(raw)
        .map_err(|e| DomainError::storage(format!("Invalid bank key in database: {}", e)))
}

fn row_to_record(row: &PgRow) -> Result<BankRecord, DomainError> {
    let bank_key: String = get(row, "bank_key")?;

    Ok(BankRecord {
        bank_key: parse_key(&bank_key)?,
        course: get(row, "course")?,
        unit: get(row, "unit")?,
        title: get(row, "title")?,
        created_at: get(row, "created_at")?,
    })
}

fn row_to_question(row: &PgRow) -> Result<Question, DomainError> {
    Ok(Question::from_parts(
        get(row, "external_id")?,
        get(row, "latex")?,
        get(row, "topic")?,
        get(row, "difficulty")?,
    ))
}
