use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::round::{CreateRoundRequest, RoundListFilter};
use crate::error::{Result, StorageError};
use crate::models::Round;

/// Repository for round database operations
pub struct RoundRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoundRepository<'a> {
    /// Create a new RoundRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a round with its advancement policy
    pub async fn create(&self, req: &CreateRoundRequest) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(
            r#"
            INSERT INTO rounds (
                round_id, event_name, round_number, is_finals, advancement_type,
                cutoff_percentage, cutoff_count, cutoff_time_ms, finals_size
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING round_id, event_name, round_number, is_finals, advancement_type,
                      cutoff_percentage, cutoff_count, cutoff_time_ms, finals_size,
                      completed_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.event_name)
        .bind(req.round_number)
        .bind(req.is_finals)
        .bind(req.advancement_type.as_str())
        .bind(req.cutoff_percentage)
        .bind(req.cutoff_count)
        .bind(req.cutoff_time_ms)
        .bind(req.finals_size)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            // Unique constraint on (event_name, round_number)
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    return StorageError::ConstraintViolation(
                        "Round number already exists for this event".to_string(),
                    );
                }
            }
            StorageError::from(e)
        })?;

        Ok(round)
    }

    /// Get a round by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Round> {
        let round = sqlx::query_as::<_, Round>(
            r#"
            SELECT round_id, event_name, round_number, is_finals, advancement_type,
                   cutoff_percentage, cutoff_count, cutoff_time_ms, finals_size,
                   completed_at, created_at
            FROM rounds
            WHERE round_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(round)
    }

    /// List rounds, optionally restricted to one event
    pub async fn list(&self, filter: &RoundListFilter) -> Result<Vec<Round>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT round_id, event_name, round_number, is_finals, advancement_type,
                   cutoff_percentage, cutoff_count, cutoff_time_ms, finals_size,
                   completed_at, created_at
            FROM rounds
            WHERE 1=1
            "#,
        );

        if let Some(ref event) = filter.event {
            query.push(" AND event_name = ");
            query.push_bind(event);
        }

        query.push(" ORDER BY event_name, round_number");

        let rounds: Vec<Round> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rounds)
    }

    /// Claim the one-shot completion slot for a round. Returns false when
    /// the round was already completed.
    pub async fn claim_completion(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE rounds SET completed_at = now() WHERE round_id = $1 AND completed_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Release a claim after a failed completion run so the round can be
    /// completed again.
    pub async fn release_completion(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE rounds SET completed_at = NULL WHERE round_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
