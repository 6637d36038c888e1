//! Postgres outbox table and consumer cursors.
//!
//! BIGSERIAL leaves holes when a transaction rolls back or hasn't committed
//! yet. `read_from` never reads past such a hole, so a tailing consumer
//! sees a strictly contiguous prefix of the stream and can retry the rest
//! on its next poll.

use anyhow::Result;
use sqlx::PgPool;

use crate::types::{AppendEvent, StoredEvent};

/// Append-only outbox plus named consumer cursors.
#[derive(Clone)]
pub struct OutboxStore {
    pool: PgPool,
}

impl OutboxStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the outbox tables if they do not exist yet. Idempotent.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS outbox_events (
                seq        BIGSERIAL PRIMARY KEY,
                ts         TIMESTAMPTZ NOT NULL DEFAULT now(),
                event_type TEXT NOT NULL,
                payload    JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS outbox_cursors (
                name TEXT PRIMARY KEY,
                seq  BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a fact. Returns the assigned sequence number.
    pub async fn append(&self, event: AppendEvent) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO outbox_events (event_type, payload)
            VALUES ($1, $2)
            RETURNING seq
            "#,
        )
        .bind(&event.event_type)
        .bind(&event.payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Read up to `limit` events in sequence order, starting at `seq_start`
    /// (inclusive). The batch ends at the first missing sequence number, so
    /// callers can hand off consecutive seqs without reordering; whatever sat
    /// past the hole comes back once the hole closes.
    pub async fn read_from(&self, seq_start: i64, limit: usize) -> Result<Vec<StoredEvent>> {
        let rows = sqlx::query_as::<_, StoredEvent>(
            r#"
            SELECT seq, ts, event_type, payload
            FROM outbox_events
            WHERE seq >= $1
            ORDER BY seq ASC
            LIMIT $2
            "#,
        )
        .bind(seq_start)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        // Truncate the batch at the first hole in the sequence.
        let mut result = Vec::with_capacity(rows.len());
        let mut expected_seq = seq_start;

        for row in rows {
            if row.seq != expected_seq {
                break;
            }
            expected_seq = row.seq + 1;
            result.push(row);
        }

        Ok(result)
    }

    /// The next sequence a named consumer should read. 1 if never set.
    pub async fn cursor(&self, name: &str) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT seq FROM outbox_cursors WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(seq,)| seq).unwrap_or(1))
    }

    /// Advance a named consumer's cursor.
    pub async fn set_cursor(&self, name: &str, seq: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO outbox_cursors (name, seq)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET seq = EXCLUDED.seq
            "#,
        )
        .bind(name)
        .bind(seq)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
