use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::{AffinityScore, Answers, Identity, Submission, SubmissionDraft, ZodiacSign};

/// Errors that can occur when reading or writing the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Incomplete submission: missing {0}")]
    IncompleteSubmission(&'static str),

    #[error("Corrupt row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

/// Append-only table of every submission, in arrival order
///
/// Rows are never updated or deleted. Each `append` is a single INSERT, so a
/// row is either fully written or not written at all.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Connect to a SQLite database and run migrations
    ///
    /// `sqlite::memory:` is pinned to one long-lived connection, since every
    /// in-memory connection is a separate database.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let in_memory = database_url.contains(":memory:");

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs));

        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Record store ready at {}", database_url);

        Ok(Self { pool })
    }

    /// Fresh in-memory store
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1, 5).await
    }

    /// Persist a fully derived submission
    ///
    /// Fails with [`StoreError::IncompleteSubmission`] before touching the
    /// database if the zodiac sign or affinity score has not been set.
    pub async fn append(&self, draft: &SubmissionDraft) -> Result<Submission, StoreError> {
        let zodiac_sign = draft
            .zodiac_sign
            .ok_or(StoreError::IncompleteSubmission("zodiac_sign"))?;
        let affinity_score = draft
            .affinity_score
            .ok_or(StoreError::IncompleteSubmission("affinity_score"))?;
        let created_at = Utc::now();

        let query = r#"
            INSERT INTO submissions (
                Name, Phone, Insta, month, day, sex, sexorient,
                degree, sociability, acqmark, zodiac, ALQ, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
        "#;

        let identity = &draft.identity;
        let answers = &draft.answers;

        let row = sqlx::query(query)
            .bind(&identity.name)
            .bind(&identity.phone)
            .bind(&identity.insta)
            .bind(i64::from(answers.month))
            .bind(i64::from(answers.day))
            .bind(&answers.sex)
            .bind(&answers.sexorient)
            .bind(&answers.degree)
            .bind(&answers.sociability)
            .bind(&answers.acqmark)
            .bind(zodiac_sign.name())
            .bind(affinity_score.value())
            .bind(created_at)
            .fetch_one(&self.pool)
            .await?;

        let id: i64 = row.try_get("id")?;

        tracing::debug!(
            "Appended submission {} ({}, ALQ {})",
            id,
            zodiac_sign,
            affinity_score.value()
        );

        Ok(Submission {
            id,
            identity: identity.clone(),
            answers: answers.clone(),
            zodiac_sign,
            affinity_score,
            created_at,
        })
    }

    /// Snapshot of every submission in insertion order
    pub async fn all(&self) -> Result<Vec<Submission>, StoreError> {
        let query = r#"
            SELECT id, Name, Phone, Insta, month, day, sex, sexorient,
                   degree, sociability, acqmark, zodiac, ALQ, created_at
            FROM submissions
            ORDER BY id ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter().map(decode_submission).collect()
    }

    /// Number of stored submissions
    pub async fn count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn decode_submission(row: &SqliteRow) -> Result<Submission, StoreError> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |reason: String| StoreError::CorruptRow { id, reason };

    let month: i64 = row.try_get("month")?;
    let day: i64 = row.try_get("day")?;
    let zodiac: String = row.try_get("zodiac")?;
    let alq: f64 = row.try_get("ALQ")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let zodiac_sign = ZodiacSign::from_str(&zodiac).map_err(|e| corrupt(e.to_string()))?;
    let affinity_score =
        AffinityScore::new(alq).ok_or_else(|| corrupt(format!("non-finite ALQ {}", alq)))?;

    Ok(Submission {
        id,
        identity: Identity {
            name: row.try_get("Name")?,
            phone: row.try_get("Phone")?,
            insta: row.try_get("Insta")?,
        },
        answers: Answers {
            month: u8::try_from(month).map_err(|_| corrupt(format!("month {}", month)))?,
            day: u8::try_from(day).map_err(|_| corrupt(format!("day {}", day)))?,
            sex: row.try_get("sex")?,
            sexorient: row.try_get("sexorient")?,
            degree: row.try_get("degree")?,
            sociability: row.try_get("sociability")?,
            acqmark: row.try_get("acqmark")?,
        },
        zodiac_sign,
        affinity_score,
        created_at,
    })
}
