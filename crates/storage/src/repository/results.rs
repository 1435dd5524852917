use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::advancement::AdvancementStatus;
use crate::dto::result::RecordResultRequest;
use crate::error::{Result, StorageError};
use crate::models::RoundResult;

pub struct RoundResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoundResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace a competitor's result for a round. Re-recording
    /// clears any advancement status from a previous calculation.
    pub async fn upsert(&self, round_id: Uuid, req: &RecordResultRequest) -> Result<RoundResult> {
        let result = sqlx::query_as::<_, RoundResult>(
            r#"
            INSERT INTO round_results (
                round_id, student_id, student_name, best_time_ms, is_dnf, is_dns
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (round_id, student_id) DO UPDATE SET
                student_name = EXCLUDED.student_name,
                best_time_ms = EXCLUDED.best_time_ms,
                is_dnf = EXCLUDED.is_dnf,
                is_dns = EXCLUDED.is_dns,
                advancement_status = NULL,
                recorded_at = now()
            RETURNING round_id, student_id, student_name, best_time_ms, is_dnf, is_dns,
                      advancement_status, recorded_at
            "#,
        )
        .bind(round_id)
        .bind(req.student_id)
        .bind(&req.student_name)
        .bind(req.best_time_ms)
        .bind(req.is_dnf)
        .bind(req.is_dns)
        .fetch_one(self.pool)
        .await?;

        Ok(result)
    }

    /// List all results recorded for a round
    pub async fn list_for_round(&self, round_id: Uuid) -> Result<Vec<RoundResult>> {
        let results = sqlx::query_as::<_, RoundResult>(
            r#"
            SELECT round_id, student_id, student_name, best_time_ms, is_dnf, is_dns,
                   advancement_status, recorded_at
            FROM round_results
            WHERE round_id = $1
            ORDER BY recorded_at, student_id
            "#,
        )
        .bind(round_id)
        .fetch_all(self.pool)
        .await?;

        Ok(results)
    }

    /// Write the advancement status for one competitor in a round
    pub async fn set_advancement_status(
        &self,
        round_id: Uuid,
        student_id: Uuid,
        status: AdvancementStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE round_results SET advancement_status = $1 WHERE round_id = $2 AND student_id = $3",
        )
        .bind(status.as_str())
        .bind(round_id)
        .bind(student_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// List results that carry an advancement status, optionally a single
    /// status, fastest first
    pub async fn list_with_status(
        &self,
        round_id: Uuid,
        status: Option<AdvancementStatus>,
    ) -> Result<Vec<RoundResult>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT round_id, student_id, student_name, best_time_ms, is_dnf, is_dns,
                   advancement_status, recorded_at
            FROM round_results
            WHERE advancement_status IS NOT NULL
            "#,
        );

        query.push(" AND round_id = ");
        query.push_bind(round_id);

        if let Some(status) = status {
            query.push(" AND advancement_status = ");
            query.push_bind(status.as_str());
        }

        query.push(" ORDER BY best_time_ms ASC NULLS LAST, student_id");

        let results: Vec<RoundResult> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(results)
    }
}
