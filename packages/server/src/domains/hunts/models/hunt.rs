use anyhow::Result;
use chrono::{DateTime, Utc};
use leadscan::HuntSummary;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Lifecycle of a dispatched run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HuntStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for HuntStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HuntStatus::Running => write!(f, "running"),
            HuntStatus::Completed => write!(f, "completed"),
            HuntStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One search run. The row is the dispatch acknowledgement (run id +
/// status) and, once finalized, the write-once summary log.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hunt {
    pub id: Uuid,
    pub intent: String,
    pub city: String,
    pub mode: String,
    pub status: String,
    pub queries_executed: i32,
    pub results_scanned: i32,
    pub leads_found: i32,
    pub domains: Vec<String>,
    pub duration_ms: Option<i64>,
    pub error: Option<String>,
    pub created_by: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Hunt {
    /// Insert the row for a freshly dispatched run.
    pub async fn start(
        intent: &str,
        city: &str,
        mode: &str,
        created_by: Uuid,
        pool: &PgPool,
    ) -> Result<Self> {
        let hunt = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO hunts (id, intent, city, mode, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(intent)
        .bind(city)
        .bind(mode)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(hunt)
    }

    /// Finalize a completed run with its summary. Happens once; the
    /// status guard keeps a late finalize from clobbering a failure.
    pub async fn finalize(summary: &HuntSummary, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE hunts SET
                status = 'completed',
                queries_executed = $2,
                results_scanned = $3,
                leads_found = $4,
                domains = $5,
                duration_ms = $6,
                finished_at = NOW()
            WHERE id = $1 AND status = 'running'
            "#,
        )
        .bind(summary.hunt_id)
        .bind(summary.queries_executed as i32)
        .bind(summary.results_scanned as i32)
        .bind(summary.leads_found as i32)
        .bind(&summary.domains)
        .bind(summary.duration.as_millis() as i64)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn mark_failed(id: Uuid, error: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE hunts SET status = 'failed', error = $2, finished_at = NOW()
            WHERE id = $1 AND status = 'running'
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let hunt = sqlx::query_as::<_, Self>("SELECT * FROM hunts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(hunt)
    }

    pub async fn recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let hunts =
            sqlx::query_as::<_, Self>("SELECT * FROM hunts ORDER BY started_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(pool)
                .await?;
        Ok(hunts)
    }

    pub async fn count_total(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hunts")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
