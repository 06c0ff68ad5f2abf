//! Outbox Repository
//!
//! Manages outbox rows: transactional enqueue on the write side, and the
//! claim/mark lifecycle used by relay workers on the read side.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::uow::UnitOfWork;

/// Outbox row status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Publishing,
    Published,
    Dead,
}

impl From<String> for OutboxStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => OutboxStatus::Pending,
            "publishing" => OutboxStatus::Publishing,
            "published" => OutboxStatus::Published,
            "dead" => OutboxStatus::Dead,
            _ => OutboxStatus::Pending,
        }
    }
}

impl std::fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutboxStatus::Pending => write!(f, "pending"),
            OutboxStatus::Publishing => write!(f, "publishing"),
            OutboxStatus::Published => write!(f, "published"),
            OutboxStatus::Dead => write!(f, "dead"),
        }
    }
}

/// Stored outbox row
#[derive(Debug, Clone)]
pub struct OutboxMessage {
    pub id: Uuid,
    pub channel: String,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Outbox repository errors
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

type OutboxRow = (
    Uuid,
    String,
    serde_json::Value,
    String,
    i32,
    DateTime<Utc>,
    Option<String>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn from_row(row: OutboxRow) -> OutboxMessage {
    let (id, channel, payload, status, attempts, next_attempt_at, last_error, created_at, published_at) =
        row;
    OutboxMessage {
        id,
        channel,
        payload,
        status: OutboxStatus::from(status),
        attempts,
        next_attempt_at,
        last_error,
        created_at,
        published_at,
    }
}

/// Repository for outbox rows
#[derive(Debug, Clone)]
pub struct OutboxRepository {
    pool: PgPool,
}

impl OutboxRepository {
    /// Create a new OutboxRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stage a message for the given channel inside the caller's transaction.
    /// The row becomes visible to relay workers only once that transaction
    /// commits; rollback discards it together with the mutation.
    pub async fn enqueue<M: Serialize>(
        &self,
        uow: &mut UnitOfWork,
        channel: &str,
        message: &M,
    ) -> Result<Uuid, OutboxError> {
        let payload = serde_json::to_value(message)?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO outbox_messages (channel, payload)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(channel)
        .bind(&payload)
        .fetch_one(&mut **uow.tx())
        .await?;

        Ok(id)
    }

    /// Claim up to `limit` due pending rows for this worker.
    /// `FOR UPDATE SKIP LOCKED` lets concurrent workers claim disjoint sets,
    /// so each row is processed by exactly one attempt at a time.
    pub async fn claim_batch(&self, limit: u32) -> Result<Vec<OutboxMessage>, OutboxError> {
        let rows: Vec<OutboxRow> = sqlx::query_as(
            r#"
            UPDATE outbox_messages
            SET status = 'publishing', claimed_at = NOW()
            WHERE id IN (
                SELECT id FROM outbox_messages
                WHERE status = 'pending' AND next_attempt_at <= NOW()
                ORDER BY created_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, channel, payload, status, attempts,
                      next_attempt_at, last_error, created_at, published_at
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    /// Mark a row as delivered to the broker.
    /// Called only after broker acknowledgment.
    pub async fn mark_published(&self, id: Uuid) -> Result<(), OutboxError> {
        sqlx::query(
            r#"
            UPDATE outbox_messages
            SET status = 'published', published_at = NOW(), claimed_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a failed publish attempt. The row returns to pending with the
    /// given retry time, or moves to dead once the attempt ceiling is hit.
    pub async fn mark_failed(
        &self,
        id: Uuid,
        retry_at: DateTime<Utc>,
        max_attempts: i32,
        error: &str,
    ) -> Result<OutboxStatus, OutboxError> {
        let status: String = sqlx::query_scalar(
            r#"
            UPDATE outbox_messages
            SET attempts = attempts + 1,
                last_error = $2,
                claimed_at = NULL,
                status = CASE WHEN attempts + 1 >= $3 THEN 'dead' ELSE 'pending' END,
                next_attempt_at = $4
            WHERE id = $1
            RETURNING status
            "#,
        )
        .bind(id)
        .bind(error)
        .bind(max_attempts)
        .bind(retry_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(OutboxStatus::from(status))
    }

    /// Release rows claimed by a worker that never finished, so another
    /// worker can pick them up.
    pub async fn release_stale_claims(
        &self,
        older_than: std::time::Duration,
    ) -> Result<u64, OutboxError> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(older_than)
                .unwrap_or_else(|_| chrono::Duration::seconds(300));

        let rows = sqlx::query(
            r#"
            UPDATE outbox_messages
            SET status = 'pending', claimed_at = NULL
            WHERE status = 'publishing' AND claimed_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    /// Fetch a row by id (used by tests and diagnostics)
    pub async fn get(&self, id: Uuid) -> Result<Option<OutboxMessage>, OutboxError> {
        let row: Option<OutboxRow> = sqlx::query_as(
            r#"
            SELECT id, channel, payload, status, attempts,
                   next_attempt_at, last_error, created_at, published_at
            FROM outbox_messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    /// Count rows in the given status
    pub async fn count_by_status(&self, status: &OutboxStatus) -> Result<i64, OutboxError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM outbox_messages WHERE status = $1")
                .bind(status.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
